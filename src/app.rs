//! Command implementations.

use crate::cli::{Cli, Command};
use crate::error::{ErrorKind, Result};
use crate::output::Output;
use crate::session::Session;
use bezglutena_config::Config;
use bezglutena_preferences::{Disclaimer, FileFlagStore, FlagStore};
use bezglutena_scanner::{Constraints, LineScanner, Scanner, decoded, start_with_fallback};
use bezglutena_scrape::{Crawler, Options as CrawlOptions};
use exn::ResultExt;
use futures::StreamExt;
use std::io::Write;
use std::path::PathBuf;
use std::pin::pin;
use std::time::Duration;
use tokio::io::BufReader;

pub async fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_deref()).or_raise(|| ErrorKind::Config)?;
    let output = Output::new(cli.json);
    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr();

    if cli.shows_disclaimer() {
        match self::flag_store(&config) {
            Ok(store) => self::show_disclaimer(&store, &mut stderr).await?,
            Err(err) => {
                tracing::warn!(error = ?err, "Preferences unavailable, showing disclaimer");
                writeln!(stderr, "{}", Disclaimer::TEXT).or_raise(|| ErrorKind::Output)?;
            },
        }
    }

    match cli.command {
        Command::Lookup { codes } => {
            let session = self::load_session(&config, cli.dataset.as_deref(), &mut stderr).await?;
            self::lookup(&session, &codes, &output, &mut stdout)?;
        },
        Command::Scan { continuous } => {
            let session = self::load_session(&config, cli.dataset.as_deref(), &mut stderr).await?;
            let mut scanner = LineScanner::new("stdin", BufReader::new(tokio::io::stdin()));
            let scanned = self::scan(&mut scanner, &config.scanner, &session, continuous, &output, &mut stdout).await;
            if let Err(err) = &scanned
                && matches!(&**err, ErrorKind::Scanner)
            {
                writeln!(stderr, "Camera unavailable, scanning closed.").or_raise(|| ErrorKind::Output)?;
            }
            scanned?;
        },
        Command::Stats => {
            let session = self::load_session(&config, cli.dataset.as_deref(), &mut stderr).await?;
            output.stats(&mut stdout, &session).or_raise(|| ErrorKind::Output)?;
        },
        Command::Dismiss => {
            let store = self::flag_store(&config)?;
            self::dismiss(&store).await?;
            writeln!(stderr, "Disclaimer hidden.").or_raise(|| ErrorKind::Output)?;
        },
        Command::Scrape { output: path } => {
            let path = path.unwrap_or_else(|| config.scrape.output.clone());
            let mut options = CrawlOptions::new(&config.scrape.base_url).or_raise(|| ErrorKind::Scrape)?;
            options.user_agent = config.scrape.user_agent.clone();
            options.delay = Duration::from_millis(config.scrape.delay_ms);
            let crawler = Crawler::new(options).or_raise(|| ErrorKind::Scrape)?;
            let report = crawler.run(&path).await.or_raise(|| ErrorKind::Scrape)?;
            output.scraped(&mut stdout, &report, &path).or_raise(|| ErrorKind::Output)?;
        },
    }
    Ok(())
}

fn flag_store(config: &Config) -> Result<FileFlagStore> {
    let dir: PathBuf = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => FileFlagStore::default_dir().or_raise(|| ErrorKind::Preferences)?,
    };
    FileFlagStore::new(dir).or_raise(|| ErrorKind::Preferences)
}

/// Fetch and index the dataset once. A failed fetch is reported on `err` and
/// the session carries on empty.
async fn load_session(config: &Config, dataset: Option<&str>, err: &mut impl Write) -> Result<Session> {
    let location = match dataset {
        Some(location) => location.to_string(),
        None => config.dataset.location(),
    };
    let source = bezglutena_source::open(&location).or_raise(|| ErrorKind::Dataset(location.clone()))?;
    let session = Session::load(source.as_ref(), config.dataset.ean_policy).await;
    if let Some(message) = session.load_error() {
        writeln!(err, "{message}").or_raise(|| ErrorKind::Output)?;
    }
    Ok(session)
}

pub(crate) async fn show_disclaimer(store: &(impl FlagStore + ?Sized), w: &mut impl Write) -> Result<()> {
    let disclaimer = match Disclaimer::load(store).await {
        Ok(disclaimer) => disclaimer,
        Err(err) => {
            tracing::warn!(error = ?err, "Could not read disclaimer flag");
            Disclaimer::default()
        },
    };
    if disclaimer.is_visible() {
        writeln!(w, "{}", Disclaimer::TEXT).or_raise(|| ErrorKind::Output)?;
        writeln!(w, "(Run `bezglutena dismiss` to stop showing this.)").or_raise(|| ErrorKind::Output)?;
    }
    Ok(())
}

pub(crate) async fn dismiss(store: &(impl FlagStore + ?Sized)) -> Result<()> {
    let mut disclaimer = Disclaimer::load(store).await.or_raise(|| ErrorKind::Preferences)?;
    disclaimer.dismiss(store).await.or_raise(|| ErrorKind::Preferences)
}

/// Look up every code; returns how many were found.
pub(crate) fn lookup(session: &Session, codes: &[String], output: &Output, w: &mut impl Write) -> Result<usize> {
    let mut found = 0;
    for code in codes {
        let result = session.lookup(code);
        tracing::info!(ean = code.trim(), found = result.is_some(), "Lookup");
        found += usize::from(result.is_some());
        output.lookup(w, code, result).or_raise(|| ErrorKind::Output)?;
    }
    Ok(found)
}

/// Run a scan session: every decoded barcode is looked up once. Without
/// `continuous`, the first decoded barcode ends the session.
///
/// Returns how many barcodes were looked up.
pub(crate) async fn scan<S: Scanner + ?Sized>(
    scanner: &mut S,
    constraints: &Constraints,
    session: &Session,
    continuous: bool,
    output: &Output,
    w: &mut impl Write,
) -> Result<usize> {
    let events = start_with_fallback(scanner, constraints).await.or_raise(|| ErrorKind::Scanner)?;
    let mut codes = pin!(decoded(events));
    let mut scanned = 0;
    while let Some(code) = codes.next().await {
        let result = session.lookup(&code);
        tracing::info!(ean = code.trim(), found = result.is_some(), "Scanned");
        output.lookup(w, &code, result).or_raise(|| ErrorKind::Output)?;
        scanned += 1;
        if !continuous {
            break;
        }
    }
    scanner.stop().await.or_raise(|| ErrorKind::ScannerStop)?;
    Ok(scanned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bezglutena_catalog::EanPolicy;
    use bezglutena_preferences::MemoryFlagStore;
    use bezglutena_scanner::{MockScanner, ScanEvent};
    use bezglutena_source::MockSource;

    const PAYLOAD: &str = r#"{"title":"Ajvar blagi 195 g","details":{"EAN":"3850104022517"}}
{"title":"Pašteta 100 g","details":{"EAN":"3850104000010"}}
"#;

    async fn session() -> Session {
        Session::load(&MockSource::with_payload(PAYLOAD), EanPolicy::Strict).await
    }

    fn events() -> Vec<ScanEvent> {
        vec![
            ScanEvent::DecodeFailed("no barcode".into()),
            ScanEvent::Decoded("385 0104022517".into()),
            ScanEvent::Decoded("3850104000010".into()),
        ]
    }

    #[tokio::test]
    async fn test_lookup() {
        let session = session().await;
        let mut out = Vec::new();
        let codes = vec!["3850104022517".to_string(), "123".to_string()];
        let found = lookup(&session, &codes, &Output::new(false), &mut out).unwrap();
        assert_eq!(found, 1);
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("Ajvar blagi 195 g\n"));
        assert!(text.ends_with("123: not found\n"));
    }

    #[tokio::test]
    async fn test_scan_stops_after_first_decode() {
        let session = session().await;
        let mut scanner = MockScanner::new(events());
        let mut out = Vec::new();
        let scanned = scan(&mut scanner, &Constraints::default(), &session, false, &Output::new(false), &mut out)
            .await
            .unwrap();
        assert_eq!(scanned, 1);
        assert_eq!(scanner.stops(), 1);
        assert!(String::from_utf8(out).unwrap().starts_with("Ajvar blagi 195 g\n"));
    }

    #[tokio::test]
    async fn test_scan_continuous() {
        let session = session().await;
        let mut scanner = MockScanner::new(events());
        let mut out = Vec::new();
        let scanned = scan(&mut scanner, &Constraints::default(), &session, true, &Output::new(true), &mut out)
            .await
            .unwrap();
        assert_eq!(scanned, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[tokio::test]
    async fn test_scan_falls_back() {
        let session = session().await;
        let mut scanner = MockScanner::new(events()).rejecting(|c| c.aspect_ratio.is_some());
        let mut out = Vec::new();
        let scanned = scan(&mut scanner, &Constraints::default(), &session, false, &Output::new(false), &mut out)
            .await
            .unwrap();
        assert_eq!(scanned, 1);
        assert_eq!(scanner.starts().len(), 2);
    }

    #[tokio::test]
    async fn test_scan_camera_unavailable() {
        let session = session().await;
        let mut scanner = MockScanner::new(events()).rejecting(|_| true);
        let mut out = Vec::new();
        let err = scan(&mut scanner, &Constraints::default(), &session, false, &Output::new(false), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Scanner));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_scan_stop_failure_is_not_camera_failure() {
        let session = session().await;
        let mut scanner = MockScanner::new(events()).failing_stop();
        let mut out = Vec::new();
        let err = scan(&mut scanner, &Constraints::default(), &session, false, &Output::new(false), &mut out)
            .await
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::ScannerStop));
        // The scanned barcode was still looked up and shown.
        assert!(String::from_utf8(out).unwrap().starts_with("Ajvar blagi 195 g\n"));
    }

    #[tokio::test]
    async fn test_scan_with_failed_load() {
        let session = Session::load(&MockSource::with_status(404), EanPolicy::Strict).await;
        let mut scanner = MockScanner::new(events());
        let mut out = Vec::new();
        scan(&mut scanner, &Constraints::default(), &session, true, &Output::new(false), &mut out)
            .await
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "385 0104022517: not found\n3850104000010: not found\n");
    }

    #[tokio::test]
    async fn test_disclaimer_until_dismissed() {
        let store = MemoryFlagStore::new();
        let mut err = Vec::new();
        show_disclaimer(&store, &mut err).await.unwrap();
        assert!(String::from_utf8(err).unwrap().starts_with(Disclaimer::TEXT));

        dismiss(&store).await.unwrap();
        let mut err = Vec::new();
        show_disclaimer(&store, &mut err).await.unwrap();
        assert!(err.is_empty());
    }
}
