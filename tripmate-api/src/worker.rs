use chrono::{DateTime, NaiveTime, TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use tripmate_core::repository::PlanRepository;

/// Next sweep boundary strictly after `now`: plans are swept at 00:00 and
/// 12:00 UTC.
fn next_tick(now: DateTime<Utc>) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
    let date = now.date_naive();
    if now.time() < noon {
        Utc.from_utc_datetime(&date.and_time(noon))
    } else {
        let next = date.succ_opt().unwrap_or(date);
        Utc.from_utc_datetime(&next.and_time(NaiveTime::MIN))
    }
}

async fn run_sweeps(repo: &dyn PlanRepository) {
    let today = Utc::now().date_naive();

    match repo.start_due(today).await {
        Ok(n) if n > 0 => tracing::info!("Lifecycle sweep started {} plan(s)", n),
        Ok(_) => tracing::debug!("Lifecycle sweep: no plans due to start"),
        Err(e) => tracing::error!("Lifecycle sweep failed to start plans: {}", e),
    }

    match repo.complete_due(today).await {
        Ok(n) if n > 0 => tracing::info!("Lifecycle sweep completed {} plan(s)", n),
        Ok(_) => tracing::debug!("Lifecycle sweep: no plans due to complete"),
        Err(e) => tracing::error!("Lifecycle sweep failed to complete plans: {}", e),
    }
}

/// Background task that advances overdue plans twice a day. The sweeps are
/// idempotent, so a missed tick is caught up by the next one.
pub async fn start_lifecycle_worker(repo: Arc<dyn PlanRepository>) {
    tracing::info!("Plan lifecycle worker started");

    loop {
        let now = Utc::now();
        let tick = next_tick(now);
        let wait = (tick - now).to_std().unwrap_or(Duration::ZERO);
        tracing::debug!("Next lifecycle sweep at {}", tick);

        tokio::time::sleep(wait).await;
        run_sweeps(repo.as_ref()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, h, m, s).unwrap()
    }

    #[test]
    fn test_morning_rolls_to_noon() {
        assert_eq!(next_tick(at(0, 0, 0)), at(12, 0, 0));
        assert_eq!(next_tick(at(11, 59, 59)), at(12, 0, 0));
    }

    #[test]
    fn test_afternoon_rolls_to_next_midnight() {
        let midnight_next = Utc.with_ymd_and_hms(2024, 6, 16, 0, 0, 0).unwrap();
        assert_eq!(next_tick(at(12, 0, 0)), midnight_next);
        assert_eq!(next_tick(at(23, 30, 0)), midnight_next);
    }

    #[test]
    fn test_tick_is_strictly_in_the_future() {
        for (h, m) in [(0, 0), (11, 59), (12, 0), (23, 59)] {
            let now = at(h, m, 0);
            assert!(next_tick(now) > now);
        }
    }
}
