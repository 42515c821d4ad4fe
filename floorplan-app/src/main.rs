use std::path::PathBuf;

use floorplan_config::{AppConfig, ConfigError};
use floorplan_engine::command::CommandRequest;
use floorplan_frontend::cli::CliOptions;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Debug, Default)]
struct AppArgs {
    config: Option<PathBuf>,
    cli: CliOptions,
}

fn main() {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{message}");
            eprintln!(
                "用法: floorplan-app [--config PATH] [--plan PATH] [--export PATH] [--command NAME [ARGS..]]..."
            );
            std::process::exit(1);
        }
    };

    let (config, config_issue) = load_configuration(args.config);
    init_logging(&config);
    if let Some(issue) = &config_issue {
        report_config_issue(issue);
    }
    info!("启动平面图应用");

    if let Err(err) = floorplan_frontend::run_cli(&args.cli, &config) {
        error!(error = %err, "执行平面图 CLI 失败");
        std::process::exit(1);
    }
}

/// `--command` 之后直到下一个 `--` 开头的参数都归属该命令。
fn parse_args<I>(args: I) -> Result<AppArgs, String>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = AppArgs::default();
    let mut args = args.into_iter().peekable();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => parsed.config = Some(PathBuf::from(required(&mut args, "--config")?)),
            "--plan" => parsed.cli.plan = Some(PathBuf::from(required(&mut args, "--plan")?)),
            "--export" => {
                parsed.cli.export = Some(PathBuf::from(required(&mut args, "--export")?))
            }
            "--command" => {
                let name = required(&mut args, "--command")?;
                let mut command_args = Vec::new();
                while let Some(next) = args.next_if(|next| !next.starts_with("--")) {
                    command_args.push(next);
                }
                parsed
                    .cli
                    .commands
                    .push(CommandRequest::with_args(name, command_args));
            }
            other => return Err(format!("未知参数：{other}")),
        }
    }
    Ok(parsed)
}

fn required(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, String> {
    args.next()
        .ok_or_else(|| format!("`{flag}` 需要提供参数值"))
}

/// 日志尚未初始化时遇到的配置错误，初始化后再补记。
#[derive(Debug)]
struct ConfigIssue {
    error: ConfigError,
    explicit: bool,
}

fn load_configuration(override_path: Option<PathBuf>) -> (AppConfig, Option<ConfigIssue>) {
    let loaded = match override_path {
        Some(path) => AppConfig::from_file(&path).map_err(|error| ConfigIssue {
            error,
            explicit: true,
        }),
        None => AppConfig::discover().map_err(|error| ConfigIssue {
            error,
            explicit: false,
        }),
    };
    match loaded {
        Ok(config) => (config, None),
        Err(issue) => (AppConfig::default(), Some(issue)),
    }
}

fn report_config_issue(issue: &ConfigIssue) {
    let message = if issue.explicit {
        "加载指定配置失败，使用默认配置"
    } else {
        "加载默认配置失败，使用内建默认值"
    };
    match &issue.error {
        ConfigError::Io { path, .. } | ConfigError::Parse { path, .. } => {
            warn!(path = %path.display(), error = %issue.error, "{message}");
        }
        ConfigError::Context { .. } => {
            warn!(error = %issue.error, "{message}");
        }
    }
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_new(config.logging.level.clone()).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(filter);
    if subscriber.try_init().is_err() {
        // 已初始化，忽略
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn parses_paths_and_commands() {
        let parsed = parse_args(args(&[
            "--plan",
            "plan.json",
            "--command",
            "select_all",
            "--command",
            "move_selection",
            "100",
            "-50",
            "--export",
            "out.json",
        ]))
        .unwrap();

        assert_eq!(parsed.cli.plan, Some(PathBuf::from("plan.json")));
        assert_eq!(parsed.cli.export, Some(PathBuf::from("out.json")));
        assert!(parsed.config.is_none());
        assert_eq!(parsed.cli.commands.len(), 2);
        assert_eq!(parsed.cli.commands[0].name, "select_all");
        assert!(parsed.cli.commands[0].args.is_empty());
        assert_eq!(parsed.cli.commands[1].name, "move_selection");
        assert_eq!(parsed.cli.commands[1].args, vec!["100", "-50"]);
    }

    #[test]
    fn rejects_unknown_flags_and_missing_values() {
        assert!(parse_args(args(&["--verbose"])).is_err());
        assert!(parse_args(args(&["--config"])).is_err());
        assert!(parse_args(args(&["--command"])).is_err());
    }

    #[test]
    fn missing_config_falls_back_and_warning_is_logged() {
        let dir = tempfile::tempdir().unwrap();
        let (config, issue) = load_configuration(Some(dir.path().join("absent.toml")));
        assert_eq!(config.logging.level, "info");
        let issue = issue.expect("missing file should be reported");
        assert!(issue.explicit);
        assert!(matches!(issue.error, ConfigError::Io { .. }));

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = fmt().with_writer(move || writer.clone()).finish();
        tracing::subscriber::with_default(subscriber, || report_config_issue(&issue));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("加载指定配置失败"), "{output}");
        assert!(output.contains("absent.toml"), "{output}");
    }

    #[test]
    fn readable_config_has_nothing_to_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();
        let (config, issue) = load_configuration(Some(path));
        assert_eq!(config.logging.level, "debug");
        assert!(issue.is_none());
    }
}
