//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::ChartError;

fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화
///
/// `RUST_LOG` 가 있으면 우선하고, 없으면 설정 파일의 레벨을 사용합니다.
/// 로그는 stderr 로 출력되어 stdout 의 JSON 출력과 섞이지 않습니다.
pub fn init(configured_level: &str) -> Result<(), ChartError> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| configured_level.to_string());
    let level_filter = parse_level(&log_level);

    Builder::new()
        .filter_level(level_filter)
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| ChartError::ConfigError(format!("Failed to initialize logger: {}", e)))?;

    log::debug!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 오류 로그
pub fn log_error(context: &str, error: &ChartError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level("warn"), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }
}
