//! Navigation targets handed to the hosting platform.

use serde::Serialize;

use crate::domain::types::LocationId;

/// Object the list creates and opens records of.
pub const LOCATION_OBJECT: &str = "sked__Location__c";
/// Guided flow that sets up a new location.
pub const SETUP_WIZARD_URL: &str = "/flow/SObject_Setup";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordAction {
    New,
    View,
}

/// Opaque descriptor forwarded to the navigation service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NavigationTarget {
    ObjectPage {
        object_api_name: String,
        action: RecordAction,
    },
    WebPage {
        url: String,
    },
    RecordPage {
        record_id: LocationId,
        action: RecordAction,
    },
}

impl NavigationTarget {
    pub fn new_location() -> Self {
        NavigationTarget::ObjectPage {
            object_api_name: LOCATION_OBJECT.to_string(),
            action: RecordAction::New,
        }
    }

    pub fn setup_wizard() -> Self {
        NavigationTarget::WebPage {
            url: SETUP_WIZARD_URL.to_string(),
        }
    }

    pub fn view_record(record_id: LocationId) -> Self {
        NavigationTarget::RecordPage {
            record_id,
            action: RecordAction::View,
        }
    }
}
