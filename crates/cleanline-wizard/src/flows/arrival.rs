/*
[INPUT]:  Property code and access PIN typed on site, expected values for the job
[OUTPUT]: Arrival gate that names the field that failed
[POS]:    Flow layer - arrival verification step of the job flow
[UPDATE]: When arrival checks gain or lose fields
*/

use serde::{Deserialize, Serialize};

use crate::step::{StepId, WizardStep};
use crate::validate::{Validator, all, equals_reference, required};

pub const PROPERTY_CODE: &str = "property_code";
pub const ACCESS_PIN: &str = "access_pin";

/// Values the cleaner must reproduce on arrival
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalReference {
    pub property_code: String,
    pub access_pin: String,
}

/// Both fields must be present and match exactly; the first failing field is reported
pub fn arrival_validator(reference: &ArrivalReference) -> Validator {
    all(vec![
        required(PROPERTY_CODE, "Property code"),
        required(ACCESS_PIN, "Access PIN"),
        equals_reference(
            PROPERTY_CODE,
            "Property code",
            reference.property_code.clone(),
        ),
        equals_reference(ACCESS_PIN, "Access PIN", reference.access_pin.clone()),
    ])
}

pub fn arrival_step<S: StepId>(id: S, reference: &ArrivalReference) -> WizardStep<S> {
    WizardStep::new(id, "Verify arrival")
        .hint("Enter the property code and access PIN posted at the entrance")
        .validate(arrival_validator(reference))
}
