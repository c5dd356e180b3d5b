//! Record creation and update on the in-memory ledger
//!
//! None of these touch assignments: a created officer starts available, a
//! created case starts pending and unassigned. Linking is always the
//! assignment engine's job.

use super::ledger::Ledger;
use crate::errors::{BikeWatchError, Result};
use crate::model::{
    Case, CaseId, Citizen, CitizenId, NewCase, NewCitizen, NewOfficer, Officer, OfficerId,
};
use crate::rules::validation::{validate_description, validate_email, validate_name};

/// Create a new available officer
///
/// # Errors
/// * `InvalidInput` - If the name or email is malformed
/// * `EmailTaken` - If an active officer already uses the email
pub fn create_officer(ledger: &mut Ledger, new: NewOfficer) -> Result<OfficerId> {
    validate_name(&new.name)?;
    validate_email(&new.email)?;

    let taken = ledger
        .list_officers()
        .iter()
        .any(|o| o.email.eq_ignore_ascii_case(&new.email));
    if taken {
        return Err(BikeWatchError::EmailTaken { email: new.email });
    }

    let id = ledger.next_officer_id();
    ledger.insert_officer(Officer::new(id, new.name.trim().to_string(), new.email));
    Ok(id)
}

/// Register a citizen
///
/// # Errors
/// * `InvalidInput` - If the name or email is malformed
/// * `EmailTaken` - If a citizen already uses the email
pub fn create_citizen(ledger: &mut Ledger, new: NewCitizen) -> Result<CitizenId> {
    validate_name(&new.name)?;
    validate_email(&new.email)?;

    let taken = ledger
        .list_citizens()
        .iter()
        .any(|c| c.email.eq_ignore_ascii_case(&new.email));
    if taken {
        return Err(BikeWatchError::EmailTaken { email: new.email });
    }

    let id = ledger.next_citizen_id();
    ledger.insert_citizen(Citizen::new(id, new.name.trim().to_string(), new.email));
    Ok(id)
}

/// Create a pending, unassigned case
///
/// # Errors
/// * `InvalidInput` - If the description is blank or too long
/// * `CitizenNotFound` - If the reporter is not a registered citizen
pub fn create_case(ledger: &mut Ledger, new: NewCase) -> Result<CaseId> {
    validate_description(&new.description)?;
    ledger.get_citizen(new.reporter)?;

    let id = ledger.next_case_id();
    ledger.insert_case(Case::new(id, new.description, new.reporter));
    Ok(id)
}

/// Change an officer's display name
///
/// # Errors
/// * `InvalidInput` - If the name is malformed
/// * `OfficerNotFound` - If the officer doesn't exist or was removed
pub fn rename_officer(ledger: &mut Ledger, id: OfficerId, name: String) -> Result<()> {
    validate_name(&name)?;
    let officer = ledger.get_officer_mut(id)?;
    officer.name = name.trim().to_string();
    Ok(())
}
