use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// The five-way classification of an exchange report's outcome.
///
/// Mirrors the Postgres enum `overall_report_type` written by the verifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "overall_report_type", rename_all = "snake_case")]
pub enum OverallReportType {
    Ok,
    Skip,
    Unrecorded,
    SpecialCase,
    Bad,
}

impl OverallReportType {
    pub const ALL: [OverallReportType; 5] = [
        OverallReportType::Ok,
        OverallReportType::Skip,
        OverallReportType::Unrecorded,
        OverallReportType::SpecialCase,
        OverallReportType::Bad,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OverallReportType::Ok => "ok",
            OverallReportType::Skip => "skip",
            OverallReportType::Unrecorded => "unrecorded",
            OverallReportType::SpecialCase => "special_case",
            OverallReportType::Bad => "bad",
        }
    }
}

impl FromStr for OverallReportType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OverallReportType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidOverallReportType(s.to_string()))
    }
}

impl fmt::Display for OverallReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The family prefix shared by a group of report item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportItemFamily {
    Skip,
    Unrec,
    Spec,
    Err,
    Rpsl,
    Recursion,
}

/// The finer-grained classification of a report item.
///
/// Mirrors the Postgres enum `report_item_type`; the JSON literal and the
/// database literal are the same snake_case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "report_item_type", rename_all = "snake_case")]
pub enum ReportItemType {
    SkipRegexTilde,
    SkipRegexWithSet,
    SkipCommunity,
    UnrecImportEmpty,
    UnrecExportEmpty,
    UnrecFilterSet,
    UnrecAsRoutes,
    UnrecRouteSet,
    UnrecAsSet,
    UnrecAsSetRoute,
    UnrecSomeAsSetRoute,
    UnrecAutNum,
    UnrecPeeringSet,
    SpecUphill,
    SpecUphillTier1,
    SpecTier1Pair,
    SpecImportPeerOifps,
    SpecImportCustomerOifps,
    SpecExportCustomers,
    SpecImportFromNeighbor,
    SpecAsIsOriginButNoRoute,
    SpecAsSetContainsOriginButNoRoute,
    ErrFilter,
    ErrFilterAsNum,
    ErrFilterAsSet,
    ErrFilterPrefixes,
    ErrFilterRouteSet,
    ErrRemoteAsNum,
    ErrRemoteAsSet,
    ErrExceptPeeringRight,
    ErrPeering,
    ErrRegex,
    RpslAsName,
    RpslFilter,
    RpslRegex,
    RpslUnknownFilter,
    Recursion,
}

impl ReportItemType {
    pub const ALL: [ReportItemType; 37] = [
        ReportItemType::SkipRegexTilde,
        ReportItemType::SkipRegexWithSet,
        ReportItemType::SkipCommunity,
        ReportItemType::UnrecImportEmpty,
        ReportItemType::UnrecExportEmpty,
        ReportItemType::UnrecFilterSet,
        ReportItemType::UnrecAsRoutes,
        ReportItemType::UnrecRouteSet,
        ReportItemType::UnrecAsSet,
        ReportItemType::UnrecAsSetRoute,
        ReportItemType::UnrecSomeAsSetRoute,
        ReportItemType::UnrecAutNum,
        ReportItemType::UnrecPeeringSet,
        ReportItemType::SpecUphill,
        ReportItemType::SpecUphillTier1,
        ReportItemType::SpecTier1Pair,
        ReportItemType::SpecImportPeerOifps,
        ReportItemType::SpecImportCustomerOifps,
        ReportItemType::SpecExportCustomers,
        ReportItemType::SpecImportFromNeighbor,
        ReportItemType::SpecAsIsOriginButNoRoute,
        ReportItemType::SpecAsSetContainsOriginButNoRoute,
        ReportItemType::ErrFilter,
        ReportItemType::ErrFilterAsNum,
        ReportItemType::ErrFilterAsSet,
        ReportItemType::ErrFilterPrefixes,
        ReportItemType::ErrFilterRouteSet,
        ReportItemType::ErrRemoteAsNum,
        ReportItemType::ErrRemoteAsSet,
        ReportItemType::ErrExceptPeeringRight,
        ReportItemType::ErrPeering,
        ReportItemType::ErrRegex,
        ReportItemType::RpslAsName,
        ReportItemType::RpslFilter,
        ReportItemType::RpslRegex,
        ReportItemType::RpslUnknownFilter,
        ReportItemType::Recursion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportItemType::SkipRegexTilde => "skip_regex_tilde",
            ReportItemType::SkipRegexWithSet => "skip_regex_with_set",
            ReportItemType::SkipCommunity => "skip_community",
            ReportItemType::UnrecImportEmpty => "unrec_import_empty",
            ReportItemType::UnrecExportEmpty => "unrec_export_empty",
            ReportItemType::UnrecFilterSet => "unrec_filter_set",
            ReportItemType::UnrecAsRoutes => "unrec_as_routes",
            ReportItemType::UnrecRouteSet => "unrec_route_set",
            ReportItemType::UnrecAsSet => "unrec_as_set",
            ReportItemType::UnrecAsSetRoute => "unrec_as_set_route",
            ReportItemType::UnrecSomeAsSetRoute => "unrec_some_as_set_route",
            ReportItemType::UnrecAutNum => "unrec_aut_num",
            ReportItemType::UnrecPeeringSet => "unrec_peering_set",
            ReportItemType::SpecUphill => "spec_uphill",
            ReportItemType::SpecUphillTier1 => "spec_uphill_tier1",
            ReportItemType::SpecTier1Pair => "spec_tier1_pair",
            ReportItemType::SpecImportPeerOifps => "spec_import_peer_oifps",
            ReportItemType::SpecImportCustomerOifps => "spec_import_customer_oifps",
            ReportItemType::SpecExportCustomers => "spec_export_customers",
            ReportItemType::SpecImportFromNeighbor => "spec_import_from_neighbor",
            ReportItemType::SpecAsIsOriginButNoRoute => "spec_as_is_origin_but_no_route",
            ReportItemType::SpecAsSetContainsOriginButNoRoute => {
                "spec_as_set_contains_origin_but_no_route"
            }
            ReportItemType::ErrFilter => "err_filter",
            ReportItemType::ErrFilterAsNum => "err_filter_as_num",
            ReportItemType::ErrFilterAsSet => "err_filter_as_set",
            ReportItemType::ErrFilterPrefixes => "err_filter_prefixes",
            ReportItemType::ErrFilterRouteSet => "err_filter_route_set",
            ReportItemType::ErrRemoteAsNum => "err_remote_as_num",
            ReportItemType::ErrRemoteAsSet => "err_remote_as_set",
            ReportItemType::ErrExceptPeeringRight => "err_except_peering_right",
            ReportItemType::ErrPeering => "err_peering",
            ReportItemType::ErrRegex => "err_regex",
            ReportItemType::RpslAsName => "rpsl_as_name",
            ReportItemType::RpslFilter => "rpsl_filter",
            ReportItemType::RpslRegex => "rpsl_regex",
            ReportItemType::RpslUnknownFilter => "rpsl_unknown_filter",
            ReportItemType::Recursion => "recursion",
        }
    }

    pub fn family(&self) -> ReportItemFamily {
        let literal = self.as_str();
        if literal.starts_with("skip_") {
            ReportItemFamily::Skip
        } else if literal.starts_with("unrec_") {
            ReportItemFamily::Unrec
        } else if literal.starts_with("spec_") {
            ReportItemFamily::Spec
        } else if literal.starts_with("err_") {
            ReportItemFamily::Err
        } else if literal.starts_with("rpsl_") {
            ReportItemFamily::Rpsl
        } else {
            ReportItemFamily::Recursion
        }
    }
}

impl FromStr for ReportItemType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReportItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CoreError::InvalidReportItemType(s.to_string()))
    }
}

impl fmt::Display for ReportItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The role an AS played in an exchange report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AsRole {
    From,
    To,
}

impl AsRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AsRole::From => "from",
            AsRole::To => "to",
        }
    }
}

impl FromStr for AsRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "from" => Ok(AsRole::From),
            "to" => Ok(AsRole::To),
            other => Err(format!("unknown AS role `{}`", other)),
        }
    }
}

pub fn is_valid_overall_report_type(value: &str) -> bool {
    value.parse::<OverallReportType>().is_ok()
}

pub fn is_valid_report_item_type(value: &str) -> bool {
    value.parse::<ReportItemType>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn overall_report_type_membership() {
        for literal in ["ok", "skip", "unrecorded", "special_case", "bad"] {
            assert!(is_valid_overall_report_type(literal), "{literal}");
        }
        assert!(!is_valid_overall_report_type("OK"));
        assert!(!is_valid_overall_report_type("specialcase"));
        assert!(!is_valid_overall_report_type(""));
    }

    #[test]
    fn report_item_type_literals_are_unique_and_round_trip() {
        let literals: HashSet<_> = ReportItemType::ALL.iter().map(|t| t.as_str()).collect();
        assert_eq!(literals.len(), ReportItemType::ALL.len());
        for ty in ReportItemType::ALL {
            assert_eq!(ty.as_str().parse::<ReportItemType>(), Ok(ty));
        }
    }

    #[test]
    fn report_item_type_rejects_unknown_literal() {
        assert!(!is_valid_report_item_type("err_nothing"));
        assert_eq!(
            "err_nothing".parse::<ReportItemType>(),
            Err(CoreError::InvalidReportItemType("err_nothing".to_string()))
        );
    }

    #[test]
    fn serde_literal_matches_database_literal() {
        for ty in ReportItemType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
        for ty in OverallReportType::ALL {
            let json = serde_json::to_string(&ty).unwrap();
            assert_eq!(json, format!("\"{}\"", ty.as_str()));
        }
    }

    #[test]
    fn snake_case_keeps_digits_and_acronyms_attached() {
        for (ty, literal) in [
            (ReportItemType::SpecUphillTier1, "spec_uphill_tier1"),
            (ReportItemType::SpecTier1Pair, "spec_tier1_pair"),
            (ReportItemType::SpecImportPeerOifps, "spec_import_peer_oifps"),
            (ReportItemType::SpecImportCustomerOifps, "spec_import_customer_oifps"),
        ] {
            assert_eq!(serde_json::to_string(&ty).unwrap(), format!("\"{literal}\""));
            assert_eq!(literal.parse::<ReportItemType>(), Ok(ty));
        }
    }

    #[test]
    fn families_follow_literal_prefix() {
        assert_eq!(ReportItemType::SkipCommunity.family(), ReportItemFamily::Skip);
        assert_eq!(ReportItemType::UnrecAutNum.family(), ReportItemFamily::Unrec);
        assert_eq!(ReportItemType::SpecTier1Pair.family(), ReportItemFamily::Spec);
        assert_eq!(ReportItemType::ErrRegex.family(), ReportItemFamily::Err);
        assert_eq!(ReportItemType::RpslFilter.family(), ReportItemFamily::Rpsl);
        assert_eq!(ReportItemType::Recursion.family(), ReportItemFamily::Recursion);
    }

    #[test]
    fn invalid_type_lists_every_accepted_value() {
        let err = "nope".parse::<OverallReportType>().unwrap_err();
        assert_eq!(
            err.accepted_values().unwrap(),
            vec!["ok", "skip", "unrecorded", "special_case", "bad"]
        );
        let err = "nope".parse::<ReportItemType>().unwrap_err();
        assert_eq!(err.accepted_values().unwrap().len(), 37);
    }
}
