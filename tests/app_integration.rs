use std::fs;
use tickerboard::AppCommand;
use tickerboard::core::config::AppConfig;
use tickerboard::core::registry::STORAGE_KEY;
use tickerboard::store::{Storage, open_storage};
use tracing::info;

// Config files pointing every path into a temp dir
mod test_utils {
    use tempfile::TempDir;

    /// Temp dir holding the config, data and exports.
    pub struct TestEnv {
        pub dir: TempDir,
        pub config_path: String,
    }

    pub fn create_env(backend: &str) -> TestEnv {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config_content = format!(
            r#"
            placeholder_slots: 3
            default_country: "US"
            storage:
              backend: {}
            auth:
              simulated_delay_ms: 0
            data_path: "{}"
            export_dir: "{}"
        "#,
            backend,
            dir.path().join("data").display(),
            dir.path().join("exports").display()
        );
        let config_path = dir.path().join("config.yaml");
        std::fs::write(&config_path, config_content).expect("Failed to write config file");

        TestEnv {
            config_path: config_path.to_string_lossy().to_string(),
            dir,
        }
    }
}

async fn run(env: &test_utils::TestEnv, command: AppCommand) {
    let result = tickerboard::run_command(command, Some(&env.config_path)).await;
    assert!(
        result.is_ok(),
        "Command failed with: {:?}",
        result.err()
    );
}

fn stored(env: &test_utils::TestEnv) -> Option<String> {
    let config = AppConfig::load_from_path(&env.config_path).unwrap();
    let storage = open_storage(&config).unwrap();
    storage.get(STORAGE_KEY).unwrap()
}

#[test_log::test(tokio::test)]
async fn test_stocks_persist_between_commands() {
    let env = test_utils::create_env("disk");

    run(
        &env,
        AppCommand::AddTicker {
            ticker: "aapl".to_string(),
            name: Some("Apple".to_string()),
        },
    )
    .await;
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "msft".to_string(),
            name: None,
        },
    )
    .await;

    let stored = stored(&env).expect("registry should be stored");
    info!(%stored, "Stored registry");
    assert!(stored.contains("\"AAPL\""));
    assert!(stored.contains("\"MSFT\""));

    run(&env, AppCommand::Tickers).await;
    run(
        &env,
        AppCommand::Overview {
            stock: Some(2),
            tab: Some("valuation".to_string()),
        },
    )
    .await;
    run(&env, AppCommand::Compare { ids: vec![2, 1] }).await;
}

#[test_log::test(tokio::test)]
async fn test_filter_is_saved_on_the_stock() {
    let env = test_utils::create_env("disk");
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "infy".to_string(),
            name: Some("Infosys".to_string()),
        },
    )
    .await;

    run(
        &env,
        AppCommand::Filter {
            id: 1,
            sets: vec![
                "countryOfIncorpation=in".to_string(),
                "failureAssumption=yes".to_string(),
                "failureTie=b".to_string(),
            ],
        },
    )
    .await;

    let stored = stored(&env).unwrap();
    assert!(stored.contains("\"countryName\":\"IN\""));
    assert!(stored.contains("\"failureTie\":\"B\""));
}

#[test_log::test(tokio::test)]
async fn test_invalid_filter_value_fails() {
    let env = test_utils::create_env("disk");
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "aapl".to_string(),
            name: None,
        },
    )
    .await;

    let result = tickerboard::run_command(
        AppCommand::Filter {
            id: 1,
            sets: vec!["countryOfIncorpation=USA".to_string()],
        },
        Some(&env.config_path),
    )
    .await;
    assert!(result.is_err());
    assert!(!stored(&env).unwrap().contains("filterData\":{"));
}

#[test_log::test(tokio::test)]
async fn test_zoom_export_writes_csv() {
    let env = test_utils::create_env("disk");
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "aapl".to_string(),
            name: Some("Apple".to_string()),
        },
    )
    .await;

    run(
        &env,
        AppCommand::Zoom {
            stock: Some(1),
            tab: Some("Past Year".to_string()),
            export: true,
        },
    )
    .await;

    let exports: Vec<_> = fs::read_dir(env.dir.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(exports.len(), 1);
    let name = exports[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("aapl_past-year_"));

    let contents = fs::read_to_string(&exports[0]).unwrap();
    assert!(contents.starts_with("Past Year\nStock: Apple\nTab: Past Year\n"));
}

#[test_log::test(tokio::test)]
async fn test_logout_clears_storage() {
    let env = test_utils::create_env("disk");
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "aapl".to_string(),
            name: None,
        },
    )
    .await;
    assert!(stored(&env).is_some());

    run(&env, AppCommand::Logout { yes: true }).await;
    assert!(stored(&env).is_none());
}

#[test_log::test(tokio::test)]
async fn test_memory_backend_forgets_between_commands() {
    let env = test_utils::create_env("memory");
    run(
        &env,
        AppCommand::AddTicker {
            ticker: "aapl".to_string(),
            name: None,
        },
    )
    .await;
    assert!(stored(&env).is_none());
}

#[test_log::test(tokio::test)]
async fn test_auth_commands() {
    let env = test_utils::create_env("memory");

    run(
        &env,
        AppCommand::SignIn {
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
        },
    )
    .await;
    run(
        &env,
        AppCommand::ResetPassword {
            new_password: "Secret#123".to_string(),
            confirm_password: "Secret#123".to_string(),
        },
    )
    .await;

    let weak = tickerboard::run_command(
        AppCommand::SignUp {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "weak".to_string(),
        },
        Some(&env.config_path),
    )
    .await;
    assert!(weak.is_err());
}

#[test_log::test(tokio::test)]
async fn test_missing_config_file_fails() {
    let result =
        tickerboard::run_command(AppCommand::Tickers, Some("/nonexistent/config.yaml")).await;
    assert!(result.is_err());
}
