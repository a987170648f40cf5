mod interface;
mod memory;

pub use interface::*;
pub use memory::*;

use crate::{Error, Result};

/// Truncates every benchmark table, one after the other.
///
/// Stops at the first failure.
pub async fn truncate_all<S>(store: &S) -> Result<()>
where
    S: Store + ?Sized,
{
    for table in Table::ALL {
        tracing::info!("Truncating {table}");
        store
            .truncate(table)
            .await
            .map_err(|source| Error::Truncate { table, source })?;
    }
    Ok(())
}
