mod client_revenue;
mod expense_item;
mod filing_type;
mod financial_event;
mod monthly_series;
mod tax_bracket;
mod tax_return;

pub use client_revenue::ClientRevenue;
pub use expense_item::ExpenseItem;
pub use filing_type::FilingType;
pub use financial_event::{EventKind, FinancialEvent};
pub use monthly_series::{MonthlySeries, YearData};
pub use tax_bracket::TaxBracket;
pub use tax_return::{ReturnKind, TaxReturn};
