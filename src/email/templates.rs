//! Email templates. Each function resolves to a (subject, html) pair; the
//! dispatcher decides how it gets delivered.

pub struct EmailContent {
    pub subject: String,
    pub html: String,
}

const DEFAULT_PROMOTIONAL_MESSAGE: &str =
    "We have some exciting news to share with you about our upcoming collection.";

/// Sent when an email joins the waitlist.
pub fn welcome_email(email: &str) -> EmailContent {
    EmailContent {
        subject: "Welcome to Our Exclusive Waitlist".to_string(),
        html: layout(
            "Welcome to Our Waitlist",
            "<h1>Thank You for Joining Our Waitlist</h1>\n\
             <p>Hello,</p>\n\
             <p>Thank you for joining our exclusive waitlist. We're thrilled to have you as part of our community.</p>\n\
             <p>We're working hard to prepare our upcoming collection, and you'll be among the first to know when it launches.</p>\n\
             <p>Stay tuned for exclusive updates and early access opportunities.</p>\n\
             <p>Best regards,<br>The Team</p>",
            email,
        ),
    }
}

/// Special announcements or offers; falls back to a stock message when no
/// custom text is supplied.
pub fn promotional_email(email: &str, custom_message: Option<&str>) -> EmailContent {
    let message = match custom_message {
        Some(text) if !text.trim().is_empty() => text,
        _ => DEFAULT_PROMOTIONAL_MESSAGE,
    };

    let body = format!(
        "<h1>Special Announcement</h1>\n\
         <p>Hello,</p>\n\
         <p>{message}</p>\n\
         <p>As a waitlist member you'll always hear it here first.</p>\n\
         <p>Best regards,<br>The Team</p>"
    );

    EmailContent {
        subject: "Special Announcement for Our Waitlist Members".to_string(),
        html: layout("Special Announcement", &body, email),
    }
}

/// Sent when the collection officially launches.
pub fn launch_email(email: &str) -> EmailContent {
    EmailContent {
        subject: "Our Collection Has Launched - Exclusive Access Inside".to_string(),
        html: layout(
            "We've Launched!",
            "<h1>We've Launched!</h1>\n\
             <p>Hello,</p>\n\
             <p>The wait is over. Our collection is now live, and as a waitlist member you get exclusive early access.</p>\n\
             <p>Thank you for being with us from the start.</p>\n\
             <p>Best regards,<br>The Team</p>",
            email,
        ),
    }
}

fn layout(title: &str, body: &str, email: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>
    body {{
      font-family: Arial, sans-serif;
      line-height: 1.6;
      color: #333;
      margin: 0;
      padding: 0;
    }}
    .container {{
      max-width: 600px;
      margin: 0 auto;
      padding: 20px;
    }}
    .content {{
      background-color: #f9f9f9;
      padding: 30px;
      border-radius: 8px;
    }}
    .footer {{
      text-align: center;
      margin-top: 30px;
      font-size: 12px;
      color: #888;
    }}
    h1 {{
      color: #000;
      margin-top: 0;
    }}
  </style>
</head>
<body>
  <div class="container">
    <div class="content">
{body}
    </div>
    <div class="footer">
      <p>&copy; 2025 Company. All rights reserved.</p>
      <p>You're receiving this email because you signed up for our waitlist with this email address: {email}</p>
    </div>
  </div>
</body>
</html>
"#
    )
}
