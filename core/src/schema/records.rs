//! Project-side records: summaries, full project detail, phases and invoice groups.

use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_bool_from_anything;

use super::{nullable, Extra};

/// An employee embedded by reference: key plus denormalized name fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "EmployeeKey")]
    pub key: i64,
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "MiddleName")]
    pub middle_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(flatten)]
    pub extra: Extra,
}

impl Employee {
    /// "First M. Last", skipping empty parts.
    pub fn full_name(&self) -> String {
        [&self.first_name, &self.middle_name, &self.last_name]
            .into_iter()
            .map(|part| part.trim())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Allowed values of the `WorkStatus` custom field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkStatusValue {
    #[serde(rename = "Active Design")]
    ActiveDesign,
    #[serde(rename = "Active Design - Submitted")]
    ActiveDesignSubmitted,
    #[serde(rename = "Active Project")]
    ActiveProject,
    #[serde(rename = "Approved Construction Plans")]
    ApprovedConstructionPlans,
}

/// A pick-list custom field: the current value plus the choices offered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkStatus {
    #[serde(rename = "Value")]
    pub value: WorkStatusValue,
    #[serde(rename = "AllowEdit")]
    pub allow_edit: bool,
    #[serde(rename = "Values")]
    pub values: Vec<WorkStatusValue>,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Company-defined fields attached to projects and phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomFields {
    #[serde(rename = "ProposalNumber")]
    pub proposal_number: String,
    #[serde(rename = "ProposalDate", deserialize_with = "nullable")]
    pub proposal_date: Option<String>,
    #[serde(rename = "CreatedDate", deserialize_with = "nullable")]
    pub created_date: Option<String>,
    #[serde(rename = "MarketingSource")]
    pub marketing_source: String,
    #[serde(rename = "NonDisclosureContact")]
    pub non_disclosure_contact: bool,
    #[serde(rename = "PO")]
    pub po: String,
    #[serde(rename = "OLDPO")]
    pub old_po: String,
    #[serde(rename = "Header")]
    pub header: String,
    // The next three arrive as 0.0 / 1.0.
    #[serde(rename = "WorkPriority", deserialize_with = "deserialize_bool_from_anything")]
    pub work_priority: bool,
    #[serde(
        rename = "ProjectConstructionCosts",
        deserialize_with = "deserialize_bool_from_anything"
    )]
    pub project_construction_costs: bool,
    #[serde(
        rename = "ConstructionCostChangeOrder",
        deserialize_with = "deserialize_bool_from_anything"
    )]
    pub construction_cost_change_order: bool,
    #[serde(rename = "BillingComment")]
    pub billing_comment: String,
    #[serde(rename = "ContractDate", deserialize_with = "nullable")]
    pub contract_date: Option<String>,
    #[serde(rename = "TMEstimate1")]
    pub tm_estimate: f64,
    #[serde(rename = "CurrentSubmittalNumber")]
    pub current_submittal_number: f64,
    #[serde(rename = "NextDeliveryDate", deserialize_with = "nullable")]
    pub next_delivery_date: Option<String>,
    #[serde(rename = "ProjectNotes")]
    pub project_notes: String,
    #[serde(rename = "ProjectedBillingDate", deserialize_with = "nullable")]
    pub projected_billing_date: Option<String>,
    #[serde(rename = "ProjectedBillingAmount", deserialize_with = "nullable")]
    pub projected_billing_amount: Option<f64>,
    #[serde(rename = "WorkStatus")]
    pub work_status: WorkStatus,
    #[serde(flatten)]
    pub extra: Extra,
}

/// One row of a `ListProjects` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectSummary {
    #[serde(rename = "ProjectKey")]
    pub key: i64,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A full project record as returned by `GetProjects`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectDetail {
    #[serde(rename = "ProjectKey")]
    pub project_key: i64,
    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "SyncToCRM")]
    pub sync_to_crm: bool,
    #[serde(rename = "CreateInCRM")]
    pub create_in_crm: bool,
    #[serde(rename = "CRMFinalSync")]
    pub crm_final_sync: bool,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "SummarizeBillingGroup")]
    pub summarize_billing_group: bool,
    #[serde(rename = "BillingDescription")]
    pub billing_description: String,
    #[serde(rename = "CompanyKey")]
    pub company_key: i64,
    #[serde(rename = "CompanyDescription")]
    pub company_description: String,
    #[serde(rename = "ProjectTypeKey")]
    pub project_type_key: i64,
    #[serde(rename = "ProjectTypeDescription")]
    pub project_type_description: String,
    #[serde(rename = "DepartmentKey")]
    pub department_key: i64,
    #[serde(rename = "DepartmentDescription")]
    pub department_description: String,
    #[serde(rename = "BudgetedOverheadRate")]
    pub budgeted_overhead_rate: f64,
    #[serde(rename = "ProjectManager")]
    pub project_manager: Employee,
    #[serde(rename = "PrincipalInCharge")]
    pub principal_in_charge: Employee,
    #[serde(rename = "MarketingContact")]
    pub marketing_contact: Employee,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "WageTableDescription")]
    pub wage_table_description: String,
    #[serde(rename = "IsCertified")]
    pub is_certified: bool,
    #[serde(rename = "RestrictTimeEntryToResourcesOnly")]
    pub restrict_time_entry_to_resources_only: bool,
    #[serde(rename = "TaxState")]
    pub tax_state: String,
    #[serde(rename = "TaxLocalDescription")]
    pub tax_local_description: String,
    #[serde(rename = "ApplySalesTax")]
    pub apply_sales_tax: bool,
    #[serde(rename = "SalesTaxCode")]
    pub sales_tax_code: String,
    #[serde(rename = "SalesTaxRate")]
    pub sales_tax_rate: f64,
    #[serde(rename = "RequireTimesheetNotes")]
    pub require_timesheet_notes: bool,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "HoursCostBudget")]
    pub hours_cost_budget: f64,
    #[serde(rename = "LaborCostBudget")]
    pub labor_cost_budget: f64,
    #[serde(rename = "ExpenseCostBudget")]
    pub expense_cost_budget: f64,
    #[serde(rename = "ConsultantCostBudget")]
    pub consultant_cost_budget: f64,
    #[serde(rename = "PercentDistribution")]
    pub percent_distribution: f64,
    #[serde(rename = "IsFinalBudget")]
    pub is_final_budget: bool,
    #[serde(rename = "BillingType")]
    pub billing_type: String,
    #[serde(rename = "RateTableKey")]
    pub rate_table_key: i64,
    #[serde(rename = "RateTableDescription")]
    pub rate_table_description: String,
    #[serde(rename = "TotalContractAmount")]
    pub total_contract_amount: f64,
    #[serde(rename = "LaborContractAmount")]
    pub labor_contract_amount: f64,
    #[serde(rename = "ExpenseContractAmount")]
    pub expense_contract_amount: f64,
    #[serde(rename = "ConsultantContractAmount")]
    pub consultant_contract_amount: f64,
    #[serde(rename = "BillLaborAsTE")]
    pub bill_labor_as_te: bool,
    #[serde(rename = "BillExpenseAsTE")]
    pub bill_expense_as_te: bool,
    #[serde(rename = "BillConsultantAsTE")]
    pub bill_consultant_as_te: bool,
    #[serde(rename = "LockFee")]
    pub lock_fee: bool,
    #[serde(rename = "ConstructionCost")]
    pub construction_cost: f64,
    #[serde(rename = "PercentOfConstructionCost")]
    pub percent_of_construction_cost: f64,
    #[serde(rename = "LaborEntry")]
    pub labor_entry: bool,
    #[serde(rename = "ExpenseConsultantEntry")]
    pub expense_consultant_entry: bool,
    #[serde(rename = "CustomFields")]
    pub custom_fields: CustomFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// A phase of a project; `parent_key` is the project or the enclosing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    #[serde(rename = "ProjectKey")]
    pub project_key: i64,
    #[serde(rename = "PhaseKey")]
    pub phase_key: i64,
    #[serde(rename = "ParentKey")]
    pub parent_key: i64,
    #[serde(rename = "InvoiceGroupKey")]
    pub invoice_group_key: i64,
    #[serde(rename = "LastModifiedDate")]
    pub last_modified_date: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "SyncToCRM")]
    pub sync_to_crm: bool,
    #[serde(rename = "CreateInCRM")]
    pub create_in_crm: bool,
    #[serde(rename = "CRMFinalSync")]
    pub crm_final_sync: bool,
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "IsBillingGroup")]
    pub is_billing_group: bool,
    #[serde(rename = "SummarizeBillingGroup")]
    pub summarize_billing_group: bool,
    #[serde(rename = "BillingDescription")]
    pub billing_description: String,
    #[serde(rename = "ConsultantInvoiceText")]
    pub consultant_invoice_text: String,
    #[serde(rename = "ExpenseInvoiceText")]
    pub expense_invoice_text: String,
    #[serde(rename = "LaborInvoiceText")]
    pub labor_invoice_text: String,
    #[serde(rename = "PhaseInvoiceText")]
    pub phase_invoice_text: String,
    #[serde(rename = "ProjectTypeKey")]
    pub project_type_key: i64,
    #[serde(rename = "ProjectTypeDescription")]
    pub project_type_description: String,
    #[serde(rename = "DepartmentKey")]
    pub department_key: i64,
    #[serde(rename = "DepartmentDescription")]
    pub department_description: String,
    #[serde(rename = "BudgetedOverheadRate")]
    pub budgeted_overhead_rate: f64,
    #[serde(rename = "ProjectManager")]
    pub project_manager: Employee,
    #[serde(rename = "PrincipalInCharge")]
    pub principal_in_charge: Employee,
    #[serde(rename = "MarketingContact")]
    pub marketing_contact: Employee,
    #[serde(rename = "WageTableDescription")]
    pub wage_table_description: String,
    #[serde(rename = "IsCertified")]
    pub is_certified: bool,
    #[serde(rename = "RestrictTimeEntryToResourcesOnly")]
    pub restrict_time_entry_to_resources_only: bool,
    #[serde(rename = "TaxState")]
    pub tax_state: String,
    #[serde(rename = "TaxLocalDescription")]
    pub tax_local_description: String,
    #[serde(rename = "ApplySalesTax")]
    pub apply_sales_tax: bool,
    #[serde(rename = "SalesTaxCode")]
    pub sales_tax_code: String,
    #[serde(rename = "SalesTaxRate")]
    pub sales_tax_rate: f64,
    #[serde(rename = "RequireTimesheetNotes")]
    pub require_timesheet_notes: bool,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(rename = "HoursCostBudget")]
    pub hours_cost_budget: f64,
    #[serde(rename = "LaborCostBudget")]
    pub labor_cost_budget: f64,
    #[serde(rename = "ExpenseCostBudget")]
    pub expense_cost_budget: f64,
    #[serde(rename = "ConsultantCostBudget")]
    pub consultant_cost_budget: f64,
    #[serde(rename = "PercentDistribution")]
    pub percent_distribution: f64,
    #[serde(rename = "IsFinalBudget")]
    pub is_final_budget: bool,
    #[serde(rename = "BillingType")]
    pub billing_type: String,
    #[serde(rename = "RateTableKey")]
    pub rate_table_key: i64,
    #[serde(rename = "RateTableDescription")]
    pub rate_table_description: String,
    #[serde(rename = "TotalContractAmount")]
    pub total_contract_amount: f64,
    #[serde(rename = "LaborContractAmount")]
    pub labor_contract_amount: f64,
    #[serde(rename = "ExpenseContractAmount")]
    pub expense_contract_amount: f64,
    #[serde(rename = "ConsultantContractAmount")]
    pub consultant_contract_amount: f64,
    #[serde(rename = "BillLaborAsTE")]
    pub bill_labor_as_te: bool,
    #[serde(rename = "BillExpenseAsTE")]
    pub bill_expense_as_te: bool,
    #[serde(rename = "BillConsultantAsTE")]
    pub bill_consultant_as_te: bool,
    #[serde(rename = "LockFee")]
    pub lock_fee: bool,
    #[serde(rename = "LaborEntry")]
    pub labor_entry: bool,
    #[serde(rename = "ExpenseConsultantEntry")]
    pub expense_consultant_entry: bool,
    #[serde(rename = "CustomFields")]
    pub custom_fields: CustomFields,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Billing grouping of a project's phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceGroup {
    #[serde(rename = "InvoiceGroupKey")]
    pub invoice_group_key: i64,
    #[serde(rename = "ProjectKey")]
    pub project_key: i64,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "ClientKey")]
    pub client_key: i64,
    #[serde(rename = "ClientDescription")]
    pub client_description: String,
    #[serde(rename = "InvoiceFormatKey")]
    pub invoice_format_key: i64,
    #[serde(rename = "InvoiceFormatDescription")]
    pub invoice_format_description: String,
    #[serde(rename = "EmailInvoiceTemplateKey")]
    pub email_invoice_template_key: i64,
    #[serde(rename = "EmailInvoiceTemplateDescription")]
    pub email_invoice_template_description: String,
    #[serde(rename = "EmailClientStatementTemplateDescription")]
    pub email_client_statement_template_description: String,
    #[serde(rename = "PrintBackup")]
    pub print_backup: bool,
    #[serde(rename = "EmailIncludeBackup")]
    pub email_include_backup: bool,
    #[serde(rename = "BillingManager")]
    pub billing_manager: Employee,
    #[serde(rename = "InvoiceHeaderText")]
    pub invoice_header_text: String,
    #[serde(rename = "InvoiceFooterText")]
    pub invoice_footer_text: String,
    #[serde(rename = "InvoiceScope")]
    pub invoice_scope: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Extra,
}
