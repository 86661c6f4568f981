use clap::{Args, Parser, Subcommand};

use rowgate_pipeline::config::ResourceConfig;

use crate::error::CliError;

#[derive(Parser)]
#[command(name = "rowgate", about = "Запись потока JSON записей в MySQL таблицу и дедупликация по ней")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Записать записи из stdin в таблицу (mysql-table)
    Table(RunArgs),
    /// Вывести в stdout только записи, ключа которых ещё нет в таблице (mysql-filter)
    Filter(RunArgs),
}

#[derive(Args, Clone)]
pub struct RunArgs {
    /// Путь к TOML конфиг файлу ресурса
    #[arg(long, default_value = "rowgate.toml", env = "ROWGATE_CONFIG")]
    pub config: String,

    /// Connection string, перекрывает `connection` из файла
    #[arg(long, env = "ROWGATE_CONNECTION", hide_env_values = true)]
    pub connection: Option<String>,

    /// Максимальная длина входной строки в байтах (0 = без ограничения)
    #[arg(long, default_value_t = 0)]
    pub max_line: usize,

    /// Размер буфера канала stdin → ресурс
    #[arg(long, default_value_t = 1024)]
    pub buffer: usize,
}

impl RunArgs {
    /// Итоговая конфигурация ресурса: файл < `--connection`/env.
    pub fn load(&self) -> Result<ResourceConfig, CliError> {
        let mut config = load_resource_config(&self.config)?;
        if let Some(connection) = &self.connection {
            config.connection = connection.clone();
        }
        Ok(config)
    }
}

pub fn load_resource_config(path: &str) -> Result<ResourceConfig, CliError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| CliError::Config { context: "read", detail: format!("'{path}': {e}") })?;
    toml::from_str(&content)
        .map_err(|e| CliError::Config { context: "parse", detail: format!("'{path}': {e}") })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_temp(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!("rowgate-{}-{name}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn args(config: String, connection: Option<&str>) -> RunArgs {
        RunArgs {
            config,
            connection: connection.map(str::to_string),
            max_line: 0,
            buffer: 16,
        }
    }

    #[test]
    fn loads_file_and_applies_connection_override() {
        let path = write_temp(
            "override",
            r#"
            connection = "mysql://file@localhost/db"
            table = "events"
            fields = ["id"]
            "#,
        );

        let cfg = args(path.clone(), None).load().unwrap();
        assert_eq!(cfg.connection, "mysql://file@localhost/db");

        let cfg = args(path.clone(), Some("memory://")).load().unwrap();
        assert_eq!(cfg.connection, "memory://");
        assert_eq!(cfg.table, "events");

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_resource_config("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, CliError::Config { context: "read", .. }), "{err}");
    }

    #[test]
    fn bad_toml_is_a_parse_error() {
        let path = write_temp("bad", "table = ");
        let err = load_resource_config(&path).unwrap_err();
        assert!(matches!(err, CliError::Config { context: "parse", .. }), "{err}");
        std::fs::remove_file(path).unwrap();
    }
}
