//! # Protocol Adapter Generator
//!
//! Builds `zz_generated.mcp.go` (spec §4.6), selecting one of four
//! template variants by `Config.kind`. Per spec §9 these are kept as four
//! distinct render functions rather than one branching template — the
//! four engine kinds have genuinely different callback shapes, and
//! unifying them would trade readability for a few lines saved.

use super::EmitContext;
use crate::config::EngineKind;

/// Renders the complete `zz_generated.mcp.go` source text, dispatching on
/// `ctx.config.kind`.
pub fn render(ctx: &EmitContext) -> String {
    match ctx.config.kind {
        EngineKind::Builder => render_builder(ctx),
        EngineKind::TestRunner => render_test_runner(ctx),
        EngineKind::TestenvSubengine => render_testenv_subengine(ctx),
        EngineKind::DependencyDetector => render_dependency_detector(ctx),
    }
}

fn preamble(ctx: &EmitContext) -> String {
    let mut out = String::new();
    out.push_str(&ctx.fingerprint.header_line());
    out.push_str("\n\n");
    out.push_str(&format!("package {}\n\n", ctx.config.package_name));
    out.push_str("import (\n\t\"context\"\n\n\t\"forge-dev-runtime/mcpserver\"\n)\n\n");
    out
}

fn setup_footer(main_name: &str) -> String {
    format!(
        "func SetupMCPServer(ctx context.Context, srv *mcpserver.Server, callbacks Callbacks) error {{\n\
         \tsrv.RegisterTool(\"config-validate\", func(raw map[string]interface{{}}) ([]string, error) {{\n\
         \t\treturn ValidateMap(raw), nil\n\
         \t}})\n\
         \treturn registerCallbacks(ctx, srv, callbacks)\n\
         }}\n\n\
         func must{main_name}(raw map[string]interface{{}}) ({main_name}, error) {{\n\
         \treturn {main_name}FromMap(raw)\n\
         }}\n"
    )
}

fn render_builder(ctx: &EmitContext) -> String {
    let main_name = &ctx.main_type().name;
    let mut out = preamble(ctx);
    out.push_str("// Callbacks holds the user-supplied build hooks this engine dispatches to.\n");
    out.push_str("type Callbacks struct {\n");
    out.push_str(&format!(
        "\tBuild func(ctx context.Context, spec {main_name}) error\n"
    ));
    out.push_str("}\n\n");
    out.push_str("func registerCallbacks(ctx context.Context, srv *mcpserver.Server, callbacks Callbacks) error {\n");
    out.push_str(&format!(
        "\tsrv.RegisterTool(\"build\", func(raw map[string]interface{{}}) error {{\n\
         \t\tspec, err := must{main_name}(raw)\n\
         \t\tif err != nil {{\n\
         \t\t\treturn err\n\
         \t\t}}\n\
         \t\treturn callbacks.Build(ctx, spec)\n\
         \t}})\n\treturn nil\n}}\n\n"
    ));
    out.push_str(&setup_footer(main_name));
    out
}

fn render_test_runner(ctx: &EmitContext) -> String {
    let main_name = &ctx.main_type().name;
    let mut out = preamble(ctx);
    out.push_str("// Callbacks holds the user-supplied test-execution hooks this engine dispatches to.\n");
    out.push_str("type Callbacks struct {\n");
    out.push_str(&format!(
        "\tRunTests func(ctx context.Context, spec {main_name}) (passed bool, report string, err error)\n"
    ));
    out.push_str("}\n\n");
    out.push_str("func registerCallbacks(ctx context.Context, srv *mcpserver.Server, callbacks Callbacks) error {\n");
    out.push_str(&format!(
        "\tsrv.RegisterTool(\"run-tests\", func(raw map[string]interface{{}}) (bool, string, error) {{\n\
         \t\tspec, err := must{main_name}(raw)\n\
         \t\tif err != nil {{\n\
         \t\t\treturn false, \"\", err\n\
         \t\t}}\n\
         \t\treturn callbacks.RunTests(ctx, spec)\n\
         \t}})\n\treturn nil\n}}\n\n"
    ));
    out.push_str(&setup_footer(main_name));
    out
}

fn render_testenv_subengine(ctx: &EmitContext) -> String {
    let main_name = &ctx.main_type().name;
    let mut out = preamble(ctx);
    out.push_str("// Callbacks holds the user-supplied test-environment lifecycle hooks.\n");
    out.push_str("type Callbacks struct {\n");
    out.push_str(&format!(
        "\tProvision func(ctx context.Context, spec {main_name}) (handle string, err error)\n\
         \tTeardown func(ctx context.Context, handle string) error\n"
    ));
    out.push_str("}\n\n");
    out.push_str("func registerCallbacks(ctx context.Context, srv *mcpserver.Server, callbacks Callbacks) error {\n");
    out.push_str(&format!(
        "\tsrv.RegisterTool(\"provision\", func(raw map[string]interface{{}}) (string, error) {{\n\
         \t\tspec, err := must{main_name}(raw)\n\
         \t\tif err != nil {{\n\
         \t\t\treturn \"\", err\n\
         \t\t}}\n\
         \t\treturn callbacks.Provision(ctx, spec)\n\
         \t}})\n\
         \tsrv.RegisterTool(\"teardown\", func(handle string) error {{\n\
         \t\treturn callbacks.Teardown(ctx, handle)\n\
         \t}})\n\treturn nil\n}}\n\n"
    ));
    out.push_str(&setup_footer(main_name));
    out
}

fn render_dependency_detector(ctx: &EmitContext) -> String {
    let main_name = &ctx.main_type().name;
    let mut out = preamble(ctx);
    out.push_str("// Callbacks holds the user-supplied dependency-detection hook.\n");
    out.push_str("type Callbacks struct {\n");
    out.push_str(&format!(
        "\tDetect func(ctx context.Context, spec {main_name}) (dependencies []string, err error)\n"
    ));
    out.push_str("}\n\n");
    out.push_str("func registerCallbacks(ctx context.Context, srv *mcpserver.Server, callbacks Callbacks) error {\n");
    out.push_str(&format!(
        "\tsrv.RegisterTool(\"detect-dependencies\", func(raw map[string]interface{{}}) ([]string, error) {{\n\
         \t\tspec, err := must{main_name}(raw)\n\
         \t\tif err != nil {{\n\
         \t\t\treturn nil, err\n\
         \t\t}}\n\
         \t\treturn callbacks.Detect(ctx, spec)\n\
         \t}})\n\treturn nil\n}}\n\n"
    ));
    out.push_str(&setup_footer(main_name));
    out
}
