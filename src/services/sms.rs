use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when dispatching an SMS alert
#[derive(Debug, Error)]
pub enum SmsError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("SMS API returned error: {0}")]
    ApiError(String),

    #[error("refusing to send: destination equals the service number")]
    SelfSend,
}

/// Twilio-style SMS dispatch client
///
/// Used best-effort by the matching route to alert the top-ranked donor.
/// Failures here never fail a matching request; they surface only in the
/// response's smsStatus field.
pub struct SmsClient {
    base_url: String,
    account_sid: String,
    auth_token: String,
    from_number: String,
    client: Client,
}

impl SmsClient {
    pub fn new(
        base_url: String,
        account_sid: String,
        auth_token: String,
        from_number: String,
    ) -> Result<Self, SmsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            base_url,
            account_sid,
            auth_token,
            from_number,
            client,
        })
    }

    pub fn from_number(&self) -> &str {
        &self.from_number
    }

    /// Send one alert message
    pub async fn send_alert(&self, to_phone: &str, body: &str) -> Result<(), SmsError> {
        if to_phone == self.from_number {
            return Err(SmsError::SelfSend);
        }

        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url.trim_end_matches('/'),
            self.account_sid
        );

        tracing::debug!("dispatching SMS alert via {}", url);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to_phone),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(SmsError::ApiError(format!("{}: {}", status, detail)));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: String) -> SmsClient {
        SmsClient::new(
            base_url,
            "AC_test_sid".to_string(),
            "test_token".to_string(),
            "+19786506413".to_string(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_alert_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/2010-04-01/Accounts/AC_test_sid/Messages.json")
            .with_status(201)
            .with_body(r#"{"sid":"SM123"}"#)
            .create_async()
            .await;

        let sms = client(server.url());
        sms.send_alert("+919876543210", "Urgent: O- blood needed")
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_alert_api_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/2010-04-01/Accounts/AC_test_sid/Messages.json")
            .with_status(400)
            .with_body(r#"{"message":"invalid number"}"#)
            .create_async()
            .await;

        let sms = client(server.url());
        let result = sms.send_alert("+910000000000", "test").await;
        assert!(matches!(result, Err(SmsError::ApiError(_))));
    }

    #[tokio::test]
    async fn test_refuses_self_send() {
        let sms = client("http://unused.invalid".to_string());
        let result = sms.send_alert("+19786506413", "test").await;
        assert!(matches!(result, Err(SmsError::SelfSend)));
    }
}
