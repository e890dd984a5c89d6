//! Configuration loading as the subcommands see it.

use std::io::Write as _;
use std::path::PathBuf;

use hue_cli::config::{load_config, render_config};
use hue_cli::serve::{app_config, build_state, ServeArgs};
use hue_issuance::IssuanceConfig;

fn config_file(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn defaults_without_a_file() {
    assert_eq!(load_config(None).unwrap(), IssuanceConfig::default());
}

#[test]
fn rendered_yaml_fills_defaults() {
    let file = config_file("colors:\n  unit_price: 40\n  price_step: 20\n");
    let yaml = render_config(Some(file.path())).unwrap();
    let parsed = IssuanceConfig::from_yaml_str(&yaml).unwrap();
    assert_eq!(parsed.colors.unit_price, 40);
    assert_eq!(parsed.colors.price_step, 20);
    assert_eq!(parsed.render.canvas_size, 500);
    assert!(yaml.contains("words:"));
}

#[test]
fn invalid_file_is_an_error() {
    let file = config_file("colors:\n  unit_price: 45\n  price_step: 20\n");
    let err = load_config(Some(file.path())).unwrap_err();
    assert!(format!("{err:#}").contains("not a multiple"));

    let missing = PathBuf::from("/nonexistent/hue.yaml");
    assert!(load_config(Some(&missing)).is_err());
}

#[test]
fn serve_flags_override_environment() {
    let file = config_file("words:\n  issuance_enabled: true\n");
    let args = ServeArgs {
        config: Some(file.path().to_path_buf()),
        port: Some(9191),
    };
    let app = app_config(&args);
    assert_eq!(app.port, 9191);
    assert_eq!(app.config_path.as_deref(), Some(file.path()));

    let state = build_state(&args).unwrap();
    assert_eq!(state.config.port, 9191);
    assert_eq!(state.registries.words.issued_count(), 0);
}

#[test]
fn bundled_demo_config_loads() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop(); // crates
    path.pop(); // workspace root
    path.push("demos/hue.yaml");
    let config = load_config(Some(&path)).unwrap();
    assert_eq!(config.colors.owner, "treasury");
    assert_eq!(config.words.unit_price, 50);
    assert_eq!(config.colors.staked_custody.as_deref(), Some("vault"));
}
