use bidgate_domain::PortalSection;
use bidgate_domain::policy;

use super::*;

impl AuthorizationService {
    /// Returns the portal sections a subject may see.
    ///
    /// Section visibility uses unscoped checks and needs no directory lookups.
    #[must_use]
    pub fn visible_sections(&self, subject: &AuthorizationSubject) -> Vec<PortalSection> {
        policy::visible_sections(subject)
    }
}
