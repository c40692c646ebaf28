use htmlescape::encode_minimal;
use serde::Deserialize;

/// Subject line of every signup notification.
pub const SIGNUP_SUBJECT: &str = "Nouvelle demande d'inscription à valider";

/// Payload posted by the signup frontend when a user requests registration
/// approval. Fields are rendered into the notification as-is; absent fields
/// default to the empty string and no emptiness or address validation is
/// applied (the record store owns the data, this service only relays it).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl SignupRequest {
    /// Render the HTML body of the admin notification. All user-supplied
    /// fields are HTML-escaped before interpolation.
    pub fn to_html(&self) -> String {
        format!(
            r#"<h1>Nouvelle demande d'inscription</h1>
<p>Une nouvelle personne souhaite s'inscrire :</p>
<ul>
  <li><strong>Prénom :</strong> {first_name}</li>
  <li><strong>Nom :</strong> {last_name}</li>
  <li><strong>Email :</strong> {email}</li>
</ul>
<p>Connectez-vous à votre dashboard d'administration pour approuver ou rejeter cette demande dans la table "profiles".</p>"#,
            first_name = encode_minimal(&self.first_name),
            last_name = encode_minimal(&self.last_name),
            email = encode_minimal(&self.email),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_html_contains_field_values_in_list_items() {
        let request = SignupRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        };

        let html = request.to_html();

        assert!(html.contains("<li><strong>Prénom :</strong> Ada</li>"));
        assert!(html.contains("<li><strong>Nom :</strong> Lovelace</li>"));
        assert!(html.contains("<li><strong>Email :</strong> ada@example.com</li>"));
    }

    #[test]
    fn user_supplied_fields_are_html_escaped() {
        let request = SignupRequest {
            first_name: "<script>alert(1)</script>".to_string(),
            last_name: "O'Brien & Co".to_string(),
            email: "\"ada\"@example.com".to_string(),
        };

        let html = request.to_html();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp; Co"));
        assert!(!html.contains("\"ada\""));
    }

    #[test]
    fn missing_fields_deserialize_to_empty_strings() {
        let request: SignupRequest = serde_json::from_str(r#"{"firstName":"Ada"}"#).unwrap();

        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "");
        assert_eq!(request.email, "");
    }
}
