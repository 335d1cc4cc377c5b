use super::paths::resolve_config_path;
use super::util::{parse_bool, split_csv};
use super::*;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Mutex::new(()));
    if lock.is_poisoned() {
        lock.clear_poison();
    }
    lock
}

fn clear_env() {
    let vars = [
        "EXO_CLASSIFIER_CONFIG",
        "EXO_ARTIFACTS_DIR",
        "EXO_WARM_ARTIFACTS",
        "EXO_MODEL_VERSION",
        "EXO_IMPUTER_ID",
        "EXO_SCALER_ID",
        "EXO_CALIBRATOR_ID",
        "EXO_EXPLANATION_TOP_K",
        "EXO_REQUIRED_FEATURES",
    ];
    for v in vars {
        std::env::remove_var(v);
    }
}

fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
    let path = dir.path().join("classifier.conf");
    let mut f = std::fs::File::create(&path).expect("create file");
    f.write_all(body.as_bytes()).expect("write file");
    path
}

#[test]
fn defaults_match_the_checked_in_artifacts() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let cfg = ServiceConfig::load().expect("load config");
    assert!(cfg.artifacts_dir.ends_with("artifacts/tabular-v1"));
    assert!(cfg.warm_artifacts);
    assert_eq!(cfg.model_version, "tabular-v1.0");
    assert_eq!(cfg.calibrator_id, "isotonic");
    assert_eq!(cfg.explanation_top_k, 3);
    assert_eq!(
        cfg.required_features,
        vec!["period_days", "transit_depth_ppm", "snr"]
    );
}

#[test]
fn file_config_is_loaded() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(
        &dir,
        "[artifacts]\ndir=\"/srv/exo/tabular-v2\"\nwarm=false\n[version]\nmodel=\"tabular-v2.0\"\ncalibrator=\"platt\"\n[explanation]\ntop_k=5\n[features]\nrequired=[\"period_days\", \"snr\"]\n",
    );
    std::env::set_var("EXO_CLASSIFIER_CONFIG", &path);

    let cfg = ServiceConfig::load().expect("load config");
    assert_eq!(cfg.artifacts_dir, PathBuf::from("/srv/exo/tabular-v2"));
    assert!(!cfg.warm_artifacts);
    assert_eq!(cfg.model_version, "tabular-v2.0");
    assert_eq!(cfg.imputer_id, "numeric_imputer.json");
    assert_eq!(cfg.calibrator_id, "platt");
    assert_eq!(cfg.explanation_top_k, 5);
    assert_eq!(cfg.required_features, vec!["period_days", "snr"]);

    let options = cfg.service_options();
    assert_eq!(options.top_k, 5);
    assert_eq!(options.versions.calibrator, "platt");

    clear_env();
}

#[test]
fn env_overrides_file_values() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(&dir, "[version]\nmodel=\"from-file\"\n[explanation]\ntop_k=4\n");
    std::env::set_var("EXO_CLASSIFIER_CONFIG", &path);
    std::env::set_var("EXO_MODEL_VERSION", "from-env");
    std::env::set_var("EXO_EXPLANATION_TOP_K", "0");
    std::env::set_var("EXO_REQUIRED_FEATURES", "snr, transit_depth_ppm,,");
    std::env::set_var("EXO_WARM_ARTIFACTS", "off");
    std::env::set_var("EXO_ARTIFACTS_DIR", dir.path());

    let cfg = ServiceConfig::load().expect("load config");
    assert_eq!(cfg.model_version, "from-env");
    assert_eq!(cfg.explanation_top_k, 1);
    assert_eq!(cfg.required_features, vec!["snr", "transit_depth_ppm"]);
    assert!(!cfg.warm_artifacts);
    assert_eq!(cfg.artifacts_dir, dir.path());

    clear_env();
}

#[test]
fn missing_explicit_config_is_an_error() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    std::env::set_var("EXO_CLASSIFIER_CONFIG", dir.path().join("absent.conf"));
    assert!(resolve_config_path().is_err());
    assert!(ServiceConfig::load().is_err());

    clear_env();
}

#[test]
fn malformed_toml_is_reported() {
    let _guard = env_lock().lock().expect("env lock");
    clear_env();

    let dir = tempfile::tempdir().expect("temp dir");
    let path = write_config(&dir, "[explanation\ntop_k=3\n");
    std::env::set_var("EXO_CLASSIFIER_CONFIG", &path);

    let err = ServiceConfig::load().expect_err("parse must fail");
    assert!(format!("{err:#}").contains("failed parsing TOML config"));

    clear_env();
}

#[test]
fn helper_parsers() {
    assert!(parse_bool("Yes"));
    assert!(parse_bool(" on "));
    assert!(!parse_bool("0"));
    assert_eq!(split_csv(" a, ,b "), vec!["a", "b"]);
}
