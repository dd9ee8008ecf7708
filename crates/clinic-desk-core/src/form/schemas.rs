//! Form schemas for each editable record.

use super::{FieldSpec, FormRecord, FormSchema, Validator};
use crate::models::{Branch, Employee, InventoryItem, Patient, Service};

const SEX_OPTIONS: &[&str] = &["M", "F"];
const ROLE_OPTIONS: &[&str] = &["admin", "employee"];

/// Minimum password length accepted at login.
pub const MIN_PASSWORD_LENGTH: usize = 6;

impl FormRecord for Patient {
    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::text("givenName", "Given Name").required(),
            FieldSpec::text("middleInitial", "Middle Initial").with(Validator::MaxLength(2)),
            FieldSpec::text("lastName", "Last Name").required(),
            FieldSpec::choice("sex", "Sex", SEX_OPTIONS).required(),
            FieldSpec::date("birthday", "Birthday").required(),
            FieldSpec::count("age", "Age"),
            FieldSpec::text("address", "Address"),
            FieldSpec::text("religion", "Religion"),
            FieldSpec::text("occupation", "Occupation"),
            FieldSpec::text("philhealthID", "PhilHealth ID"),
            FieldSpec::date("lastDelivery", "Last Delivery"),
            FieldSpec::date("expectedDateConfinement", "Expected Date of Confinement"),
            FieldSpec::text("spouse.spouseName", "Spouse Name"),
            FieldSpec::date("spouse.spouseBirthday", "Spouse Birthday"),
            FieldSpec::text("spouse.spouseOccupation", "Spouse Occupation"),
            FieldSpec::text("spouse.spouseContactNumber", "Spouse Contact Number"),
            FieldSpec::count("pregnancy.gravida", "Gravida"),
            FieldSpec::count("pregnancy.para", "Para"),
            FieldSpec::date("pregnancy.LMP", "Last Menstrual Period"),
            FieldSpec::date("pregnancy.EDC", "Expected Date of Confinement (EDC)"),
            FieldSpec::boolean("medicalHistory.smoking", "Smoking"),
            FieldSpec::text("medicalHistory.allergies", "Allergies"),
            FieldSpec::boolean("medicalHistory.hypertension", "Hypertension"),
            FieldSpec::boolean("medicalHistory.previousCSection", "Previous C-Section"),
        ])
    }
}

impl FormRecord for InventoryItem {
    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::text("itemName", "Item Name").required(),
            FieldSpec::text("itemDescription", "Description"),
            FieldSpec::integer("itemQuantity", "Quantity")
                .required()
                .with(Validator::Min(0.0)),
            FieldSpec::number("itemPrice", "Price")
                .required()
                .with(Validator::Min(0.0)),
            FieldSpec::date("manufactureDate", "Manufacture Date"),
            FieldSpec::date("expDate", "Expiration Date"),
            FieldSpec::integer("branch.branchID", "Branch"),
        ])
    }
}

impl FormRecord for Service {
    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::text("service_name", "Service Name").required(),
            FieldSpec::text("service_description", "Description"),
            FieldSpec::number("service_price", "Price")
                .required()
                .with(Validator::Min(0.0)),
        ])
    }
}

impl FormRecord for Employee {
    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::text("firstName", "First Name").required(),
            FieldSpec::text("lastName", "Last Name").required(),
            FieldSpec::text("email", "Email").with(Validator::Email),
            FieldSpec::text("contactNumber", "Contact Number"),
            FieldSpec::choice("role", "Role", ROLE_OPTIONS).required(),
            FieldSpec::integer("branchID", "Branch"),
        ])
    }
}

impl FormRecord for Branch {
    fn schema() -> FormSchema {
        FormSchema::new(vec![
            FieldSpec::text("branchName", "Branch Name").required(),
            FieldSpec::text("branchAddress", "Address"),
            FieldSpec::text("branchContact", "Contact Number"),
        ])
    }
}

/// Fields of the login form.
pub fn login_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::text("username", "Username").required(),
        FieldSpec::text("password", "Password")
            .required()
            .with(Validator::MinLength(MIN_PASSWORD_LENGTH)),
    ])
}

/// Account details form.
pub fn account_details_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::text("email", "Email").required().with(Validator::Email),
    ])
}

/// Password change form.
pub fn password_schema() -> FormSchema {
    FormSchema::new(vec![
        FieldSpec::text("newPassword", "New Password")
            .required()
            .with(Validator::MinLength(MIN_PASSWORD_LENGTH)),
        FieldSpec::text("confirmPassword", "Confirm Password").required(),
    ])
}
