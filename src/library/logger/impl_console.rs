use crate::library::logger::interface::{Level, Logger};
use chrono::Utc;
use std::io::Write;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct LoggerConsole {
    namespace: Option<String>,
    timezone: chrono::FixedOffset,
}

impl LoggerConsole {
    pub fn new(timezone: chrono::FixedOffset) -> Self {
        Self {
            namespace: None,
            timezone,
        }
    }

    fn format_line(&self, level: Level, message: &str) -> String {
        let local_time = Utc::now().with_timezone(&self.timezone);
        let formatted = local_time.format("%Y-%m-%d %I:%M:%S%.3f %p");
        match &self.namespace {
            Some(namespace) => format!("[{}] {} {}: {}", formatted, level.tag(), namespace, message),
            None => format!("[{}] {} {}", formatted, level.tag(), message),
        }
    }
}

impl Logger for LoggerConsole {
    fn log(&self, level: Level, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let line = self.format_line(level, message);
        match level {
            Level::Info => writeln!(std::io::stdout().lock(), "{}", line)?,
            Level::Error => writeln!(std::io::stderr().lock(), "{}", line)?,
        }
        Ok(())
    }

    fn with_namespace(&self, namespace: &str) -> Arc<dyn Logger + Send + Sync> {
        let new_namespace = match &self.namespace {
            Some(current) => format!("{}:{}", current, namespace),
            None => namespace.to_string(),
        };

        Arc::new(LoggerConsole {
            namespace: Some(new_namespace),
            timezone: self.timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespaces_nest() {
        let logger = LoggerConsole {
            namespace: Some("analyzer".to_string()),
            timezone: chrono::FixedOffset::east_opt(0).unwrap(),
        };
        let line = logger.format_line(Level::Error, "boom");
        assert!(line.ends_with("ERROR analyzer: boom"));

        let root = LoggerConsole::new(chrono::FixedOffset::east_opt(0).unwrap());
        assert!(root.format_line(Level::Info, "hello").ends_with("INFO hello"));
        assert!(root.with_namespace("predictor").info("nested").is_ok());
    }
}
