//! Search and active-flag filtering for the supplier list.

use shared::domain::Supplier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierFilter {
    term: String,
    show_inactive: bool,
}

impl SupplierFilter {
    pub fn new(search_term: &str, show_inactive: bool) -> Self {
        Self {
            term: search_term.to_lowercase(),
            show_inactive,
        }
    }

    pub fn matches(&self, supplier: &Supplier) -> bool {
        (self.show_inactive || supplier.is_active) && self.matches_term(supplier)
    }

    fn matches_term(&self, supplier: &Supplier) -> bool {
        if self.term.is_empty() {
            return true;
        }

        let fields = &supplier.fields;
        std::iter::once(Some(fields.name.as_str()))
            .chain([
                fields.tax_id.as_deref(),
                fields.email.as_deref(),
                fields.city.as_deref(),
            ])
            .flatten()
            .any(|value| value.to_lowercase().contains(&self.term))
    }

    /// Keeps the input order.
    pub fn apply(&self, suppliers: &[Supplier]) -> Vec<Supplier> {
        suppliers
            .iter()
            .filter(|supplier| self.matches(supplier))
            .cloned()
            .collect()
    }
}
