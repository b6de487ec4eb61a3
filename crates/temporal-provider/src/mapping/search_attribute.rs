// Copyright (C) 2025 Temporal Provider contributors
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Search attribute value types and list lookups.

use std::fmt;
use std::str::FromStr;

use temporal_protocol::proto::enums::IndexedValueType;
use temporal_protocol::proto::operatorservice::ListSearchAttributesResponse;

use crate::error::ProviderError;

/// Value type of a search attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchAttributeType {
    Unspecified,
    Text,
    Keyword,
    Int,
    Double,
    Bool,
    Datetime,
    KeywordList,
}

impl SearchAttributeType {
    pub const ALL: [SearchAttributeType; 8] = [
        SearchAttributeType::Unspecified,
        SearchAttributeType::Text,
        SearchAttributeType::Keyword,
        SearchAttributeType::Int,
        SearchAttributeType::Double,
        SearchAttributeType::Bool,
        SearchAttributeType::Datetime,
        SearchAttributeType::KeywordList,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchAttributeType::Unspecified => "Unspecified",
            SearchAttributeType::Text => "Text",
            SearchAttributeType::Keyword => "Keyword",
            SearchAttributeType::Int => "Int",
            SearchAttributeType::Double => "Double",
            SearchAttributeType::Bool => "Bool",
            SearchAttributeType::Datetime => "Datetime",
            SearchAttributeType::KeywordList => "KeywordList",
        }
    }

    pub fn to_wire(self) -> IndexedValueType {
        match self {
            SearchAttributeType::Unspecified => IndexedValueType::Unspecified,
            SearchAttributeType::Text => IndexedValueType::Text,
            SearchAttributeType::Keyword => IndexedValueType::Keyword,
            SearchAttributeType::Int => IndexedValueType::Int,
            SearchAttributeType::Double => IndexedValueType::Double,
            SearchAttributeType::Bool => IndexedValueType::Bool,
            SearchAttributeType::Datetime => IndexedValueType::Datetime,
            SearchAttributeType::KeywordList => IndexedValueType::KeywordList,
        }
    }
}

impl From<IndexedValueType> for SearchAttributeType {
    fn from(value: IndexedValueType) -> Self {
        match value {
            IndexedValueType::Unspecified => SearchAttributeType::Unspecified,
            IndexedValueType::Text => SearchAttributeType::Text,
            IndexedValueType::Keyword => SearchAttributeType::Keyword,
            IndexedValueType::Int => SearchAttributeType::Int,
            IndexedValueType::Double => SearchAttributeType::Double,
            IndexedValueType::Bool => SearchAttributeType::Bool,
            IndexedValueType::Datetime => SearchAttributeType::Datetime,
            IndexedValueType::KeywordList => SearchAttributeType::KeywordList,
        }
    }
}

impl From<i32> for SearchAttributeType {
    fn from(value: i32) -> Self {
        IndexedValueType::try_from(value)
            .map(Into::into)
            .unwrap_or(SearchAttributeType::Unspecified)
    }
}

impl FromStr for SearchAttributeType {
    type Err = ProviderError;

    /// Case-insensitive display name, e.g. `keyword` or `KeywordList`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchAttributeType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ProviderError::validation(
                    "type",
                    format!(
                        "unknown search attribute type {:?}; expected one of Text, Keyword, Int, Double, Bool, Datetime, KeywordList",
                        s
                    ),
                )
            })
    }
}

impl fmt::Display for SearchAttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of a custom attribute, if `name` is registered as one.
pub fn find_custom(response: &ListSearchAttributesResponse, name: &str) -> Option<SearchAttributeType> {
    response
        .custom_attributes
        .get(name)
        .map(|v| SearchAttributeType::from(*v))
}

/// Type of `name`, checking custom attributes before system attributes.
pub fn find_any(response: &ListSearchAttributesResponse, name: &str) -> Option<SearchAttributeType> {
    find_custom(response, name).or_else(|| {
        response
            .system_attributes
            .get(name)
            .map(|v| SearchAttributeType::from(*v))
    })
}
