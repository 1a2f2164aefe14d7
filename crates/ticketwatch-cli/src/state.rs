use chrono::SecondsFormat;
use ticketwatch_core::AppConfig;
use ticketwatch_monitor::StateStore;

/// Print one line per recorded URL.
///
/// # Errors
///
/// Returns an error if the state file exists but cannot be read.
pub(crate) fn show(config: &AppConfig) -> anyhow::Result<()> {
    let store = StateStore::new(&config.state_path);
    let state = store.load()?;

    if state.is_empty() {
        println!("no state recorded in {}", store.path().display());
        return Ok(());
    }

    for (url, record) in &state {
        println!(
            "{}  {}  {url}",
            record.last_posted_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            short_sig(record.fingerprint.as_str()),
        );
    }
    Ok(())
}

/// First 12 characters; a hand-edited state file may hold any string.
fn short_sig(sig: &str) -> String {
    sig.chars().take(12).collect()
}
