//! Reconcile command handler

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_reconcile(config: Config) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let report = state.reconcile_service().await.reconcile().await?;

    println!("Examined:   {}", report.examined);
    println!("Rewritten:  {}", report.rewritten);
    println!("Backfilled: {}", report.backfilled);
    println!("Promoted:   {}", report.promoted);

    Ok(())
}
