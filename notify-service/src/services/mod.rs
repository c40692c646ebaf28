pub mod providers;

pub use providers::{
    EmailMessage, EmailProvider, MockEmailProvider, ProviderError, ProviderResponse,
    ResendProvider,
};
