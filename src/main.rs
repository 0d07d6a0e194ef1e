/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

mod cli;

use std::io::Write;

use anyhow::bail;
use xChart::chart::ChartModel;
use xChart::config::Config;
use xChart::ingest::{CsvReader, IngestSession, LoadOutcome};
use xChart::models::ColumnField;
use xChart::utils::{self, logging};

use crate::cli::Args;

fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    // 설정 로드
    let mut config = Config::load_from(&args.config)?;
    if args.assume_ms {
        config.ingest.assume_milliseconds = true;
    }
    if !args.overlays.is_empty() {
        config.indicators = args.overlays.clone();
        config.validate()?;
    }

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("xChart {} 시작: {}", xChart::VERSION, args.file.display());

    let reader = CsvReader::new(config.ingest.delimiter)?;
    let mut session = IngestSession::new(config.ingest.assume_milliseconds)
        .with_preview_rows(config.ingest.preview_rows);

    let outcome = session.load_path(&args.file, &reader).map_err(|e| {
        logging::log_error("CSV 로드", &e);
        e
    })?;

    let overridden: Vec<ColumnField> = args.mapping.iter().map(|(field, _)| *field).collect();
    let needs_mapping = match &outcome {
        LoadOutcome::NeedsMapping(suggestion) => {
            // 한 글자 매칭/미지정 필드는 --yes 또는 직접 지정으로만 확정
            let unresolved = suggestion.unresolved_fields(&overridden);
            if !args.accept_mapping && !unresolved.is_empty() {
                bail!(
                    "컬럼 매핑 확인 필요: {} (미확정: {:?}, 헤더: {}). --date/--open/--high/--low/--close 로 지정하거나 --yes 로 수락하세요",
                    session.mapping(),
                    unresolved,
                    session.headers().join(", ")
                );
            }
            true
        }
        _ => false,
    };

    if needs_mapping || !args.mapping.is_empty() {
        for (field, header) in &args.mapping {
            session.set_field(*field, Some(header.clone()));
        }
        if !session.mapping().is_complete() {
            bail!(
                "필수 컬럼 미지정: {:?} (헤더: {})",
                session.mapping().missing_required(),
                session.headers().join(", ")
            );
        }
        session.apply_mapping();
    }

    let mut chart = ChartModel::new(config.indicators.clone())?;
    chart.set_series(session.series().clone())?;

    if args.summary {
        print_summary(&session, &chart)?;
    } else {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        serde_json::to_writer_pretty(&mut out, &chart.payload())?;
        writeln!(out)?;
    }

    Ok(())
}

fn print_summary(session: &IngestSession, chart: &ChartModel) -> Result<(), anyhow::Error> {
    const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let series = chart.series();

    writeln!(out, "=== {} ===", session.file_name().unwrap_or("-"))?;
    writeln!(out, "매핑: {}", session.mapping())?;
    if let Some(report) = session.last_report() {
        writeln!(
            out,
            "행: 전체 {} / 캔들 {} / 날짜 오류 {} / 가격 오류 {}",
            report.total_rows, report.kept, report.bad_date, report.bad_price
        )?;
    }

    if let (Some(first), Some(last)) = (series.first_time(), series.last_time()) {
        writeln!(
            out,
            "기간: {} ~ {} ({:.1}일)",
            utils::format_seconds(first, TIME_FORMAT),
            utils::format_seconds(last, TIME_FORMAT),
            utils::span_days(first, last)
        )?;
    } else {
        writeln!(out, "캔들 없음")?;
    }

    if let Some(last) = series.last() {
        writeln!(
            out,
            "마지막 캔들: O {:.2} H {:.2} L {:.2} C {:.2}",
            last.open, last.high, last.low, last.close
        )?;
    }

    for overlay in chart.overlays() {
        match overlay.last_value() {
            Some(v) => writeln!(out, "{}: {:.2} ({}개)", overlay.name, v, overlay.points.len())?,
            None => writeln!(out, "{}: 데이터 부족", overlay.name)?,
        }
    }

    Ok(())
}
