//! Control-loop task
//!
//! The single owner of all dimmer state. One fixed-period tick performs, in
//! order: button sampling, fade advancement, indicator refresh, schedule
//! check. The diagnostic blink deliberately blocks this task for its
//! bounded duration (at most four 400 ms cycles).

use defmt::*;
use embassy_time::{Duration, Instant, Ticker};

use crate::board::{BoardButton, BoardController};

/// Control task - the fixed-period dimmer loop
#[embassy_executor::task]
pub async fn control_task(
    mut controller: BoardController,
    mut button: BoardButton,
    tick_interval_ms: u64,
) {
    info!("control task started");

    let mut ticker = Ticker::every(Duration::from_millis(tick_interval_ms));

    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis();
        let edge = button.poll(now_ms);
        if let Some(edge) = edge {
            debug!("button edge: {:?}", edge);
        }
        controller.tick(now_ms, edge);
    }
}
