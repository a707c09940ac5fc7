use serde::Deserialize;

use crate::domain::types::PageSize;
use crate::forms::FormError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
/// The string-typed `recordsPerPage` setting.
pub struct RecordsPerPageForm {
    pub records_per_page: String,
}

impl TryFrom<RecordsPerPageForm> for PageSize {
    type Error = FormError;

    fn try_from(form: RecordsPerPageForm) -> Result<Self, Self::Error> {
        Ok(form.records_per_page.parse()?)
    }
}
