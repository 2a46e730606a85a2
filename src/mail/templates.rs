use std::net::IpAddr;

use askama::Template;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::OutgoingEmail;
use crate::submission::metadata::ClientMeta;
use crate::submission::Submission;

/// Contact notification body. Every field is auto-escaped by askama.
#[derive(Template)]
#[template(path = "emails/contact.html")]
struct ContactEmailTemplate<'a> {
    name: &'a str,
    email: &'a str,
    company: Option<&'a str>,
    interests: String,
    message: String,
    received: String,
    ip: IpAddr,
    referer: &'a str,
    reference: Uuid,
}

pub fn render_contact(
    submission: &Submission,
    meta: &ClientMeta,
    reference: Uuid,
    received_at: DateTime<Utc>,
) -> Result<OutgoingEmail, askama::Error> {
    let template = ContactEmailTemplate {
        name: &submission.name,
        email: &submission.email,
        company: submission.company.as_deref(),
        interests: submission.interests.join(", "),
        message: submission.message.replace("\r\n", "\n"),
        received: received_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        ip: meta.ip,
        referer: &meta.referer,
        reference,
    };
    let html_body = template.render()?;

    Ok(OutgoingEmail {
        subject: format!(
            "New contact form submission from {}",
            single_line(&submission.name)
        ),
        html_body,
        reply_to_name: single_line(&submission.name),
        reply_to_address: submission.email.clone(),
    })
}

fn single_line(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}
