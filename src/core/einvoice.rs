use super::answers::TaxpayerAnswers;

/// Electronic invoicing requirement under RR 11-2025.
///
/// Independent of the tax category: VAT-threshold revenue, online selling, or
/// a POS/CAS system each bring a registered taxpayer into scope.
pub fn requires_electronic_invoice(answers: &TaxpayerAnswers) -> bool {
    if !answers.has_bir {
        return false;
    }
    answers.over_3m() || answers.online || answers.uses_pos
}
