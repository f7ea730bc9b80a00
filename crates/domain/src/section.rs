use std::str::FromStr;

use bidgate_core::AppError;
use serde::{Deserialize, Serialize};

use crate::{Action, BidTarget, Permission};

/// Navigation sections of the administration portal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalSection {
    /// Bid listing and bid detail pages.
    Bids,
    /// District administration.
    Districts,
    /// School administration.
    Schools,
    /// Evaluation committee members.
    CommitteeMembers,
    /// User administration.
    Users,
    /// Bid category administration.
    Categories,
    /// Reports.
    Reports,
}

impl PortalSection {
    /// Returns a stable transport value for this section.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bids => "bids",
            Self::Districts => "districts",
            Self::Schools => "schools",
            Self::CommitteeMembers => "committee_members",
            Self::Users => "users",
            Self::Categories => "categories",
            Self::Reports => "reports",
        }
    }

    /// Returns all sections in navigation order.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PortalSection] = &[
            PortalSection::Bids,
            PortalSection::Districts,
            PortalSection::Schools,
            PortalSection::CommitteeMembers,
            PortalSection::Users,
            PortalSection::Categories,
            PortalSection::Reports,
        ];

        ALL
    }

    /// Returns the unscoped action that makes this section visible.
    ///
    /// Visibility is a navigation gate and asks whether the permission is held
    /// anywhere; each page still checks its own target.
    #[must_use]
    pub fn visibility_action(&self) -> Action {
        match self {
            Self::Bids => Action::any_of(vec![
                Action::bid(Permission::ViewBids, BidTarget::any()),
                Action::organization(Permission::ViewBids, None),
            ]),
            Self::Districts => Action::organization(Permission::ViewDistrict, None),
            Self::Schools => Action::organization(Permission::ViewSchool, None),
            Self::CommitteeMembers => Action::any_of(vec![
                Action::bid(Permission::ManageCommitteeMembers, BidTarget::any()),
                Action::organization(Permission::ManageCommitteeMembers, None),
            ]),
            Self::Users => Action::organization(Permission::ManageUsers, None),
            Self::Categories => Action::edit_categories(),
            Self::Reports => Action::view_reports(None),
        }
    }
}

impl FromStr for PortalSection {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|section| section.as_str() == value)
            .ok_or_else(|| AppError::Validation(format!("unknown portal section '{value}'")))
    }
}
