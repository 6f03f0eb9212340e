use lqa_config::{LqaConfig, NotificationChannel};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &LqaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &LqaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if config.notifications.channel == NotificationChannel::Log
        && has_single_underscore_key(&env_keys, "LQA_NOTIFICATIONS")
    {
        warnings.push(
            "Notifications use the log channel while LQA_NOTIFICATIONS_* env vars exist. Use double underscores (example: LQA_NOTIFICATIONS__CHANNEL)."
                .to_string(),
        );
    }

    if has_single_underscore_key(&env_keys, "LQA_POLICY") {
        warnings.push(
            "LQA_POLICY_* env vars are ignored. Use double underscores (example: LQA_POLICY__PROBATION_THRESHOLD)."
                .to_string(),
        );
    }

    if config.database.path == ".lqa/lqa.db" && has_single_underscore_key(&env_keys, "LQA_DATABASE")
    {
        warnings.push(
            "Database path is the default while LQA_DATABASE_* env vars exist. Use double underscores (example: LQA_DATABASE__PATH)."
                .to_string(),
        );
    }

    warnings
}

/// `PREFIX_FIELD` instead of `PREFIX__FIELD`.
fn has_single_underscore_key(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| {
        key.strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('_') && !rest.starts_with("__"))
    })
}
