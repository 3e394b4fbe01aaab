//! Pool-wide commands: list, status, summary.

use crate::client::{AppContext, CliResult};
use crate::output::render_value;
use crate::pool::PoolClient;

/// Print the available OS types, optionally filtered by substring.
pub(crate) async fn handle_list(ctx: &AppContext, filter: Option<&str>) -> CliResult<()> {
    let pool = PoolClient::from_context(ctx)?;
    for name in pool.list(filter).await? {
        println!("{name}");
    }
    Ok(())
}

/// Print the service-wide status record.
pub(crate) async fn handle_status(ctx: &AppContext) -> CliResult<()> {
    let pool = PoolClient::from_context(ctx)?;
    let status = pool.status().await?;
    println!("{}", render_value(&status)?);
    Ok(())
}

/// Print the service's daily summary record.
pub(crate) async fn handle_summary(ctx: &AppContext) -> CliResult<()> {
    let pool = PoolClient::from_context(ctx)?;
    let summary = pool.summary().await?;
    println!("{}", render_value(&summary)?);
    Ok(())
}
