//! Home page "latest jobs" section driven by the page event loop
//!
//! Run with `RUST_LOG=listing=debug cargo run --example latest_jobs`.

use listing::prelude::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn posted(days_ago: i64) -> DateTime<Utc> {
    Utc::now() - chrono::Duration::days(days_ago)
}

fn seed_jobs() -> Vec<Entity> {
    let mut backend = Job::new("j1", "Senior Rust Engineer", posted(1));
    backend.location = Some("Remote".to_string());
    backend.salary = Some(24.0);

    let mut frontend = Job::new("j2", "Frontend Developer", posted(3));
    frontend.job_type = Some("Full Time".to_string());

    vec![
        backend.into(),
        frontend.into(),
        Job::new("j3", "Data Analyst", posted(2)).into(),
        Job::new("j4", "Rust Intern", posted(9)).into(),
        Job::new("j5", "Product Designer", posted(5)).into(),
        Job::new("j6", "DevOps Engineer", posted(4)).into(),
        Job::new("j7", "QA Engineer", posted(12)).into(),
        // Duplicate id from a sloppy backend join; the first one wins
        Job::new("j1", "Senior Rust Engineer (repost)", posted(0)).into(),
    ]
}

fn print_frame(view: &[&Entity], meta: &RenderMeta) {
    if meta.unavailable {
        println!("⚠️  Listings unavailable, showing last known results");
    }
    if meta.is_empty {
        println!("   (no jobs match {:?})\n", meta.query);
        return;
    }

    println!("📋 Latest jobs (query: {:?})", meta.query);
    for entity in view {
        let job = entity.as_job();
        println!(
            "   - {} [{}] {}",
            entity.display_field(),
            job.and_then(|j| j.location.as_deref()).unwrap_or("anywhere"),
            entity.created_at().format("%Y-%m-%d")
        );
    }
    println!();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 Listing Sync: latest jobs\n");

    let config = ViewConfig::from_yaml_str("latest_jobs_limit: 3\n")?;
    let adapter = Arc::new(StaticFetchAdapter::new(seed_jobs()));
    let session = PageSession::latest_jobs(&config);
    let mut events = session.subscribe();

    let (handle, page) = page_loop(session, adapter.clone(), print_frame);
    let task = tokio::spawn(page.run());

    handle.refresh()?;
    // Wait for the fetch to land before typing
    while let Ok(envelope) = events.recv().await {
        if envelope.event.event_kind() == "collection" {
            break;
        }
    }

    for keystroke in ["r", "ru", "rust", "rusty"] {
        handle.input(keystroke)?;
    }
    handle.scroll(120.0)?;

    adapter.set_error(FetchError::network("backend unreachable")).await;
    handle.input("")?;
    handle.refresh()?;
    while let Ok(envelope) = events.recv().await {
        if matches!(envelope.event, SessionEvent::Collection(_)) {
            break;
        }
    }

    handle.teardown()?;
    task.await?;

    println!("✅ Done ({} fetches served)", adapter.call_count());
    Ok(())
}
