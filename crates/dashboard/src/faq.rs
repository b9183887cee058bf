use crate::Faq;

/// Entries shown when a firm has not configured any FAQ of its own.
pub fn default_faqs() -> Vec<Faq> {
    [
        (
            "When do I have to pay my VAT?",
            "Quarterly filers submit the return and pay by the 20th of the month after the quarter.",
            "vat",
        ),
        (
            "How much tax should I set aside?",
            "Keep the tax estimate shown on your dashboard aside each month; your accountant refines it at year end.",
            "tax",
        ),
        (
            "Which costs are deductible?",
            "Costs made to obtain or keep taxable income, backed by a proper invoice. Ask your accountant about edge cases.",
            "costs",
        ),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (question, answer, category))| Faq {
        question: question.to_string(),
        answer: answer.to_string(),
        category: category.to_string(),
        sort_order: i as i32,
        is_active: true,
    })
    .collect()
}

/// Active entries ordered by `sort_order`, or the defaults when none remain.
pub fn faq_panel(entries: Vec<Faq>) -> Vec<Faq> {
    let mut active: Vec<Faq> = entries.into_iter().filter(|f| f.is_active).collect();
    if active.is_empty() {
        return default_faqs();
    }
    active.sort_by_key(|f| f.sort_order);
    active
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faq(question: &str, sort_order: i32, is_active: bool) -> Faq {
        Faq {
            question: question.into(),
            answer: "-".into(),
            category: "general".into(),
            sort_order,
            is_active,
        }
    }

    #[test]
    fn inactive_entries_are_hidden_and_rest_sorted() {
        let panel = faq_panel(vec![faq("b", 2, true), faq("hidden", 0, false), faq("a", 1, true)]);
        let questions: Vec<_> = panel.iter().map(|f| f.question.as_str()).collect();
        assert_eq!(questions, vec!["a", "b"]);
    }

    #[test]
    fn falls_back_to_defaults() {
        assert_eq!(faq_panel(vec![faq("hidden", 0, false)]), default_faqs());
        assert_eq!(default_faqs().len(), 3);
    }
}
