//! Fine records and fines aggregation

use serde::{Deserialize, Serialize};

/// One fiscal account entry of a patron. Sign convention: positive owed,
/// negative is a credit balance held by the library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fine {
    pub amount: f64,
    pub balance: f64,
    pub description: String,
    /// Display-formatted accrual date; empty when unknown
    pub create_date: String,
    /// Bibliographic record id, empty when the fine is not item-related
    pub bib_id: String,
}

/// Aggregate over a patron's fines list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinesSummary {
    pub total: f64,
    /// Amount the patron can pay online; present only for a strictly
    /// negative total (credit balance convention of the remote system)
    pub payable: Option<f64>,
    pub payment_url: Option<String>,
}

impl FinesSummary {
    /// Summarize a fines list. A payment URL is generated only when the sum
    /// is strictly negative and a payment base URL is configured.
    pub fn summarize(fines: &[Fine], payment_base: Option<&str>) -> Self {
        let total: f64 = fines.iter().map(|f| f.amount).sum();
        if total < 0.0 {
            let payable = -total;
            Self {
                total,
                payable: Some(payable),
                payment_url: payment_base.map(|base| format!("{}?amount={:.2}", base, payable)),
            }
        } else {
            Self {
                total,
                payable: None,
                payment_url: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fine(amount: f64) -> Fine {
        Fine {
            amount,
            balance: amount,
            description: String::new(),
            create_date: String::new(),
            bib_id: String::new(),
        }
    }

    #[test]
    fn credits_produce_payable_total_and_url() {
        let fines = vec![fine(-5.0), fine(-3.0)];
        let summary = FinesSummary::summarize(&fines, Some("https://pay.example.org/fines"));
        assert_eq!(summary.total, -8.0);
        assert_eq!(summary.payable, Some(8.0));
        assert_eq!(
            summary.payment_url.as_deref(),
            Some("https://pay.example.org/fines?amount=8.00")
        );
    }

    #[test]
    fn debit_produces_no_payment_url() {
        let fines = vec![fine(5.0)];
        let summary = FinesSummary::summarize(&fines, Some("https://pay.example.org/fines"));
        assert_eq!(summary.total, 5.0);
        assert_eq!(summary.payable, None);
        assert!(summary.payment_url.is_none());
    }

    #[test]
    fn no_base_url_means_no_link_even_for_credit() {
        let summary = FinesSummary::summarize(&[fine(-1.0)], None);
        assert_eq!(summary.payable, Some(1.0));
        assert!(summary.payment_url.is_none());
    }
}
