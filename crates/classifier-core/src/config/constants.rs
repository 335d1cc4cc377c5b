pub(super) const CONFIG_ENV_VAR: &str = "EXO_CLASSIFIER_CONFIG";

pub(super) const CONFIG_CANDIDATES: [&str; 3] = [
    "/etc/exoplanet-classifier/classifier.conf",
    "./conf/classifier.conf",
    "./classifier.conf",
];
