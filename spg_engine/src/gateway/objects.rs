use serde::{Deserialize, Serialize};
use serde_json::Value;
use spg_common::Amount;

use crate::db_types::Order;

pub const PAY_ACTION: &str = "pay";

/// The request record sent to the gateway. Field order here is the order on the wire, and therefore part of what
/// gets signed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayRequest {
    pub public_key: String,
    pub version: String,
    pub action: String,
    pub amount: String,
    pub currency: String,
    pub description: String,
    /// The gateway reference of the order
    pub order_id: String,
    pub result_url: String,
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox: Option<String>,
}

/// The fields of a payment status notification that we act on. Everything else the gateway sends is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayNotification {
    /// The gateway reference we sent with the request
    pub order_id: String,
    pub status: String,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_id: Option<Value>,
    #[serde(default)]
    pub err_code: Option<String>,
    #[serde(default)]
    pub err_description: Option<String>,
}

impl GatewayNotification {
    /// The notified amount, if present and representable with two fraction digits. The gateway sends numbers, but
    /// strings are accepted too.
    pub fn amount(&self) -> Option<Amount> {
        match self.amount.as_ref()? {
            Value::Number(n) => n.to_string().parse().ok(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

/// What the browser must POST to the gateway's checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    pub action_url: String,
    pub fields: Vec<FormField>,
}

impl CheckoutForm {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.value.as_str())
    }

    /// Renders the form as a minimal HTML page that submits itself on load.
    pub fn to_html(&self) -> String {
        let inputs = self
            .fields
            .iter()
            .map(|f| {
                format!(r#"<input type="hidden" name="{}" value="{}"/>"#, escape_html(&f.name), escape_html(&f.value))
            })
            .collect::<Vec<_>>()
            .join("\n    ");
        format!(
            r#"<!DOCTYPE html>
<html>
<body onload="document.forms[0].submit()">
  <form method="POST" action="{action}" accept-charset="utf-8">
    {inputs}
    <noscript><button type="submit">Pay</button></noscript>
  </form>
</body>
</html>
"#,
            action = escape_html(&self.action_url)
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            c => result.push(c),
        }
    }
    result
}

/// A freshly created order together with its signed gateway request. Lives only until it is handed to the browser.
#[derive(Debug, Clone)]
pub struct SignedCheckout {
    pub order: Order,
    pub request: GatewayRequest,
    /// The encoded request
    pub data: String,
    pub signature: String,
    pub checkout_url: String,
}

impl SignedCheckout {
    pub fn form(&self) -> CheckoutForm {
        let r = &self.request;
        let fields = [
            ("public_key", r.public_key.as_str()),
            ("version", r.version.as_str()),
            ("action", r.action.as_str()),
            ("amount", r.amount.as_str()),
            ("currency", r.currency.as_str()),
            ("description", r.description.as_str()),
            ("order_id", r.order_id.as_str()),
            ("result_url", r.result_url.as_str()),
            ("server_url", r.server_url.as_str()),
            ("signature", self.signature.as_str()),
            ("data", self.data.as_str()),
        ]
        .into_iter()
        .map(|(name, value)| FormField { name: name.to_string(), value: value.to_string() })
        .collect();
        CheckoutForm { action_url: self.checkout_url.clone(), fields }
    }
}
