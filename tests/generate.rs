use forge_dev::{generate, BuildInput, GenError};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const MINIMAL_CONFIG: &str = r#"
name: go-build
type: builder
version: 0.15.0
openapi:
  specPath: ./spec.openapi.yaml
generate:
  packageName: main
"#;

fn write_fixture(dir: &Path, schema_yaml: &str) {
    fs::write(dir.join("forge-dev.yaml"), MINIMAL_CONFIG).unwrap();
    fs::write(dir.join("spec.openapi.yaml"), schema_yaml).unwrap();
    fs::create_dir_all(dir.join("docs")).unwrap();
    fs::write(dir.join("docs").join("usage.md"), "# usage\n").unwrap();
}

const HEADER: &str = "openapi: 3.1.0\ninfo:\n  title: t\n  version: '1'\npaths: {}\n";

#[test]
fn minimal_builder_emits_five_source_files_and_two_docs_files() {
    let dir = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    Spec:\n      type: object\n      properties:\n        name: {{ type: string }}\n      required: [name]\n"
    );
    write_fixture(dir.path(), &schema);

    let artifact = generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();

    for file in [
        "zz_generated.spec.go",
        "zz_generated.validate.go",
        "zz_generated.mcp.go",
        "zz_generated.main.go",
        "zz_generated.docs.go",
    ] {
        let path = dir.path().join(file);
        assert!(path.is_file(), "missing {file}");
        let src = fs::read_to_string(&path).unwrap();
        assert!(
            src.starts_with("// SourceChecksum: sha256:"),
            "{file} must begin with the source checksum header"
        );
    }
    assert!(dir.path().join("docs/schema.md").is_file());
    assert!(dir.path().join("docs/list.yaml").is_file());

    let spec_src = fs::read_to_string(dir.path().join("zz_generated.spec.go")).unwrap();
    assert!(spec_src.contains("Name string `json:\"name\"`"));

    let config_bytes = fs::read(dir.path().join("forge-dev.yaml")).unwrap();
    let schema_bytes = fs::read(dir.path().join("spec.openapi.yaml")).unwrap();
    let expected_fingerprint =
        forge_dev::fingerprint::SourceFingerprint::compute(&config_bytes, &schema_bytes);
    assert_eq!(artifact.version, expected_fingerprint.as_str());
}

#[test]
fn self_referential_tree_orders_node_before_spec_and_marks_array_item() {
    let dir = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    Node:\n      type: object\n      properties:\n        value: {{ type: string }}\n        children:\n          type: array\n          items: {{ $ref: '#/components/schemas/Node' }}\n    Spec:\n      type: object\n      properties:\n        root: {{ $ref: '#/components/schemas/Node' }}\n"
    );
    write_fixture(dir.path(), &schema);

    generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();

    let spec_src = fs::read_to_string(dir.path().join("zz_generated.spec.go")).unwrap();
    let node_pos = spec_src.find("type Node struct").unwrap();
    let spec_pos = spec_src.find("type Spec struct").unwrap();
    assert!(node_pos < spec_pos, "Node must be emitted before Spec");
    assert!(spec_src.contains("Children []*Node"));
}

#[test]
fn mutual_recursion_marks_both_cross_references_as_pointers() {
    let dir = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    A:\n      type: object\n      properties:\n        b: {{ $ref: '#/components/schemas/B' }}\n    B:\n      type: object\n      properties:\n        a: {{ $ref: '#/components/schemas/A' }}\n    Spec:\n      type: object\n      properties:\n        a: {{ $ref: '#/components/schemas/A' }}\n"
    );
    write_fixture(dir.path(), &schema);

    generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();

    let spec_src = fs::read_to_string(dir.path().join("zz_generated.spec.go")).unwrap();
    assert!(spec_src.contains("B *B"));
    assert!(spec_src.contains("A *A"));

    let a_pos = spec_src.find("type A struct").unwrap();
    let b_pos = spec_src.find("type B struct").unwrap();
    let spec_pos = spec_src.find("type Spec struct").unwrap();
    assert!(a_pos < spec_pos && b_pos < spec_pos);
}

#[test]
fn union_with_discriminator_dispatches_on_mapped_values() {
    let dir = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    Circle:\n      type: object\n      properties:\n        radius: {{ type: integer }}\n    Square:\n      type: object\n      properties:\n        side: {{ type: integer }}\n    Shape:\n      oneOf:\n        - $ref: '#/components/schemas/Circle'\n        - $ref: '#/components/schemas/Square'\n      discriminator:\n        propertyName: kind\n        mapping:\n          c: '#/components/schemas/Circle'\n          s: '#/components/schemas/Square'\n    Spec:\n      type: object\n      properties:\n        shape: {{ $ref: '#/components/schemas/Shape' }}\n"
    );
    write_fixture(dir.path(), &schema);

    generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();

    let spec_src = fs::read_to_string(dir.path().join("zz_generated.spec.go")).unwrap();
    assert!(spec_src.contains("type Shape struct"));
    assert!(spec_src.contains("Circle *Circle"));
    assert!(spec_src.contains("Square *Square"));
    assert!(spec_src.contains("case \"c\":"));
    assert!(spec_src.contains("case \"s\":"));
    assert!(spec_src.contains("CircleFromMap(m)"));
    assert!(spec_src.contains("SquareFromMap(m)"));
    assert!(spec_src.contains("out.Circle = &parsed"));
    assert!(spec_src.contains("out.Square = &parsed"));
    assert!(
        !spec_src.contains("#/components/schemas/"),
        "discriminator mapping values must be resolved to bare type names"
    );
    assert!(
        spec_src.contains("func (s Shape) ToMap() map[string]interface{}"),
        "Spec.shape references Shape, so Spec.ToMap() calls s.Shape.ToMap() — Shape must define it"
    );
    assert!(spec_src.contains("m[\"shape\"] = s.Shape.ToMap()"));
}

#[test]
fn second_run_with_unchanged_inputs_hits_the_skip_cache() {
    let dir = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    Spec:\n      type: object\n      properties:\n        name: {{ type: string }}\n      required: [name]\n"
    );
    write_fixture(dir.path(), &schema);

    let first = generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();
    let mtime_after_first = fs::metadata(dir.path().join("zz_generated.spec.go"))
        .unwrap()
        .modified()
        .unwrap();

    let second = generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap();
    let mtime_after_second = fs::metadata(dir.path().join("zz_generated.spec.go"))
        .unwrap()
        .modified()
        .unwrap();

    assert_eq!(second.version, first.version);
    assert_eq!(mtime_after_first, mtime_after_second, "skip cache must not rewrite the spec file");
}

#[test]
fn invalid_config_surfaces_at_least_four_violations() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("forge-dev.yaml"),
        "name: \"\"\ntype: nonsense\nversion: v1.0\n",
    )
    .unwrap();
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(dir.path().join("docs").join("usage.md"), "# usage\n").unwrap();

    let err = generate(BuildInput {
        src: dir.path().to_path_buf(),
    })
    .unwrap_err();

    match err {
        GenError::InvalidConfig { errors } => {
            assert!(errors.len() >= 4, "expected >=4 violations, got {errors:?}");
        }
        other => panic!("expected InvalidConfig, got {other}"),
    }
}

#[test]
fn missing_source_directory_is_reported() {
    let err = generate(BuildInput {
        src: std::path::PathBuf::from("/nonexistent/path/for/forge-dev-tests"),
    })
    .unwrap_err();
    assert!(matches!(err, GenError::SrcDirMissing(_)));
}

#[test]
fn running_twice_from_scratch_produces_byte_identical_output() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    let schema = format!(
        "{HEADER}components:\n  schemas:\n    Spec:\n      type: object\n      properties:\n        name: {{ type: string }}\n        tags:\n          type: array\n          items: {{ type: string }}\n      required: [name]\n"
    );
    write_fixture(dir_a.path(), &schema);
    write_fixture(dir_b.path(), &schema);

    generate(BuildInput {
        src: dir_a.path().to_path_buf(),
    })
    .unwrap();
    generate(BuildInput {
        src: dir_b.path().to_path_buf(),
    })
    .unwrap();

    for file in ["zz_generated.spec.go", "zz_generated.validate.go", "docs/schema.md"] {
        let a = fs::read_to_string(dir_a.path().join(file)).unwrap();
        let b = fs::read_to_string(dir_b.path().join(file)).unwrap();
        assert_eq!(a, b, "{file} must be byte-identical across independent runs");
    }
}
