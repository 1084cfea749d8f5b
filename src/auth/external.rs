//! Placeholders for the interactive authentication methods.
//!
//! GitHub OAuth device flow, GitHub OIDC, and the DNS/HTTP domain challenges
//! need a browser or out-of-band proof that this client does not drive.

use super::{AuthMethodId, AuthenticationMethod};
use crate::credentials::Credential;
use crate::error::{Error, Result};
use async_trait::async_trait;

pub struct Unsupported {
    id: AuthMethodId,
}

impl Unsupported {
    pub fn new(id: AuthMethodId) -> Self {
        Unsupported { id }
    }
}

#[async_trait]
impl AuthenticationMethod for Unsupported {
    fn id(&self) -> AuthMethodId {
        self.id
    }

    async fn authenticate(&self) -> Result<Credential> {
        Err(Error::AuthNotSupported(self.id.to_string()))
    }
}
