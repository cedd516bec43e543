// SPDX-FileCopyrightText: 2026 Triage Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt text sent to the classification backend.

use triage_core::types::Ticket;

/// System instructions naming the vocabulary and the strict JSON contract.
pub fn system_prompt(known_categories: &[String]) -> String {
    let categories = known_categories.join(", ");
    format!(
        r#"You are a support ticket classification system. Analyze the provided ticket and classify it into one of the available categories.

Available categories: {categories}

You must respond ONLY with a valid JSON object containing exactly these keys:
- category: string (must be one of the available categories)
- explanation: string (brief explanation of why this category was chosen, max 100 characters)
- confidence: integer (confidence score from 1-100)

Example response:
{{"category":"Technical Support","explanation":"User experiencing login issues with the application","confidence":85}}

Do not include any other text outside the JSON object."#
    )
}

/// The ticket rendered as the user message.
pub fn ticket_content(ticket: &Ticket) -> String {
    format!(
        "Ticket Subject: {}\n\nTicket Body: {}\n\nCurrent Status: {}",
        ticket.subject, ticket.body, ticket.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use triage_core::TicketStatus;

    #[test]
    fn system_prompt_lists_vocabulary_and_example() {
        let prompt = system_prompt(&["Billing".into(), "Bug Reports".into()]);
        assert!(prompt.contains("Available categories: Billing, Bug Reports\n"));
        assert!(prompt.contains(r#"{"category":"Technical Support","#));
        assert!(prompt.ends_with("Do not include any other text outside the JSON object."));
    }

    #[test]
    fn ticket_content_includes_status() {
        let ticket = Ticket {
            id: "t".into(),
            category_id: None,
            subject: "Cannot log in".into(),
            body: "Password reset loops".into(),
            status: TicketStatus::InProgress,
            explanation: None,
            confidence: None,
            created_by: None,
            updated_by: None,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert_eq!(
            ticket_content(&ticket),
            "Ticket Subject: Cannot log in\n\nTicket Body: Password reset loops\n\nCurrent Status: in_progress"
        );
    }
}
