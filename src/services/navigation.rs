//! Header and row actions that leave the list.

use crate::domain::navigation::NavigationTarget;
use crate::domain::types::LocationId;
use crate::repository::Navigator;
use crate::services::ServiceResult;

fn go<N>(navigator: &N, target: NavigationTarget) -> ServiceResult<()>
where
    N: Navigator + ?Sized,
{
    navigator.navigate(&target).map_err(|err| {
        log::error!("Failed to navigate to {target:?}: {err}");
        err
    })?;
    Ok(())
}

/// Opens the standard "new location" form.
pub fn create_new_location<N>(navigator: &N) -> ServiceResult<()>
where
    N: Navigator + ?Sized,
{
    go(navigator, NavigationTarget::new_location())
}

/// Opens the setup wizard flow.
pub fn open_setup_wizard<N>(navigator: &N) -> ServiceResult<()>
where
    N: Navigator + ?Sized,
{
    go(navigator, NavigationTarget::setup_wizard())
}

pub fn view_location<N>(navigator: &N, id: LocationId) -> ServiceResult<()>
where
    N: Navigator + ?Sized,
{
    go(navigator, NavigationTarget::view_record(id))
}
