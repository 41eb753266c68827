//! # Entry Point Generator
//!
//! Builds `zz_generated.main.go` (spec §4.6): a `main` that calls the
//! runtime framework's `Bootstrap` with the engine name, version, and the
//! callback-registration function the adapter generator exposes.

use super::EmitContext;

/// Renders the complete `zz_generated.main.go` source text.
pub fn render(ctx: &EmitContext) -> String {
    format!(
        "{header}\n\n\
         package {package}\n\n\
         import (\n\t\"context\"\n\t\"os\"\n\n\t\"forge-dev-runtime/bootstrap\"\n)\n\n\
         func main() {{\n\
         \tctx := context.Background()\n\
         \tif err := bootstrap.Bootstrap(ctx, bootstrap.Config{{\n\
         \t\tName:    \"{name}\",\n\
         \t\tVersion: \"{version}\",\n\
         \t\tRegister: func(srv *bootstrap.Server) error {{\n\
         \t\t\treturn SetupMCPServer(ctx, srv, Callbacks{{}})\n\
         \t\t}},\n\
         \t}}); err != nil {{\n\
         \t\tos.Exit(1)\n\
         \t}}\n\
         }}\n",
        header = ctx.fingerprint.header_line(),
        package = ctx.config.package_name,
        name = ctx.config.name,
        version = ctx.config.version,
    )
}
