//! Typed category records.
//!
//! Each record is declared with `profile_record!`, which takes the
//! ordered `field: code, label, format` table and generates both the
//! struct and its `FIELDS` table from it. Every field holds the raw API
//! string (`None` when the API returned no value); the trailing
//! `state_fips` comes from the response's geography echo cell.

use serde::{Deserialize, Serialize};

use crate::Category;
use crate::decode::{DecodeError, check_row_len};
use crate::format::ValueFormat;
use crate::variables::FieldSpec;

macro_rules! profile_record {
    (
        $(#[$meta:meta])*
        $name:ident => $category:ident {
            $( $field:ident: $code:literal, $label:literal, $format:ident; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub struct $name {
            $(
                #[doc = $label]
                pub $field: Option<String>,
            )+
            /// FIPS code of the matched geography's state, echoed by the API.
            pub state_fips: Option<String>,
        }

        impl $name {
            /// The category this record belongs to.
            pub const CATEGORY: Category = Category::$category;

            /// Ordered variable table. Cell `i` of a decoded row is field `i`.
            pub const FIELDS: &'static [FieldSpec] = &[
                $(
                    FieldSpec {
                        field: stringify!($field),
                        code: $code,
                        label: $label,
                        format: ValueFormat::$format,
                    },
                )+
            ];

            /// An empty record with every field unset, for display before
            /// the first successful fetch.
            #[must_use]
            pub fn placeholder() -> Self {
                Self::default()
            }

            /// Decodes one projected response row by position.
            ///
            /// # Errors
            ///
            /// Returns [`DecodeError`] if `row.len()` is not
            /// `FIELDS.len() + 1`. No partial record is produced.
            pub fn decode(row: &[Option<String>]) -> Result<Self, DecodeError> {
                check_row_len(Self::CATEGORY, Self::FIELDS.len(), row)?;
                let mut cells = row.iter().cloned();
                Ok(Self {
                    $( $field: cells.next().flatten(), )+
                    state_fips: cells.next().flatten(),
                })
            }

            /// Field values in table order, excluding `state_fips`.
            #[must_use]
            pub fn values(&self) -> Vec<Option<&str>> {
                vec![$( self.$field.as_deref(), )+]
            }
        }
    };
}

profile_record! {
    /// Headline statistics across every topic.
    OverviewRecord => Overview {
        total_population: "DP05_0001E", "Total Population", Number;
        median_age: "DP05_0018E", "Median Age", Plain;
        median_household_income: "DP03_0062E", "Median Household Income", Currency;
        high_school_grad_p: "DP02_0067PE", "High School Grad+", Percent;
        poverty_p: "DP03_0119PE", "Poverty Rate", Percent;
        owner_occupied_p: "DP04_0046PE", "Owner-Occupied Housing", Percent;
        avg_commute_minutes: "DP03_0025E", "Avg. Commute", Plain;
        median_home_value: "DP04_0089E", "Median Home Value", Currency;
        unemployment_p: "DP03_0009PE", "Unemployment Rate", Percent;
        foreign_born: "DP02_0094E", "Foreign-Born", Number;
        veterans: "DP02_0070E", "Veterans", Number;
        households_with_computer_p: "DP02_0153PE", "Households w/ Computer", Percent;
        bachelors_or_higher_p: "DP02_0068PE", "Bachelor's Degree+", Percent;
        median_gross_rent: "DP04_0134E", "Median Gross Rent", Currency;
    }
}

profile_record! {
    /// Age, sex, race, and ethnicity.
    DemographicRecord => Demographic {
        total_population: "DP05_0001E", "Total Population", Number;
        male_population: "DP05_0002E", "Male Population", Number;
        female_population: "DP05_0003E", "Female Population", Number;
        median_age: "DP05_0018E", "Median Age", Plain;
        under_18: "DP05_0019E", "Under 18", Number;
        over_65: "DP05_0024E", "65 and Over", Number;
        white_p: "DP05_0037PE", "White", Percent;
        black_p: "DP05_0038PE", "Black", Percent;
        native_p: "DP05_0039PE", "Native American/Alaska", Percent;
        asian_p: "DP05_0047PE", "Asian", Percent;
        pacific_islander_p: "DP05_0055PE", "Pacific Islander", Percent;
        one_race_p: "DP05_0034PE", "One Race", Percent;
        two_or_more_races_p: "DP05_0061PE", "Two or More Races", Percent;
        hispanic_p: "DP05_0076PE", "Hispanic", Percent;
        white_non_hispanic_p: "DP05_0082PE", "White (Non-Hispanic)", Percent;
        sex_ratio: "DP05_0004E", "Sex Ratio (M / 100 F)", Number;
        born_in_us_p: "DP02_0090PE", "Born in USA", Percent;
        pop_21_and_over_p: "DP05_0022PE", "Population 21+", Percent;
        pop_18_and_over_p: "DP05_0021PE", "Population 18+", Percent;
        english_only_p: "DP02_0113PE", "English-language only households", Percent;
    }
}

profile_record! {
    /// Households, education, language, and ancestry.
    SocialRecord => Social {
        total_households: "DP02_0001E", "Total Households", Number;
        households_with_under_18_p: "DP02_0014PE", "Households with <18", Percent;
        households_with_over_65_p: "DP02_0015PE", "Households with 65+", Percent;
        avg_household_size: "DP02_0016E", "Avg. Household Size", Number;
        cohabiting_couple_p: "DP02_0004PE", "Cohabiting couple household", Percent;
        avg_family_size: "DP02_0017E", "Avg. Family Size", Number;
        married_couple_families_p: "DP02_0002PE", "Married-couple Families", Percent;
        high_school_enrolled_p: "DP02_0057PE", "Enrolled in High School", Percent;
        high_school_grad_p: "DP02_0067PE", "High School Grad+", Percent;
        bachelors_or_higher_p: "DP02_0068PE", "Bachelor's Degree+", Percent;
        disabled_p: "DP02_0072PE", "Disabled Population", Percent;
        veteran_p: "DP02_0070PE", "Veteran Population", Percent;
        non_english_language_p: "DP02_0114PE", "Speaks non-English Language", Percent;
        has_computer_p: "DP02_0153PE", "Has Computer", Percent;
        has_broadband_p: "DP02_0154PE", "Has Broadband", Percent;
        unmarried_women_births_p: "DP02_0038PE", "Unmarried Women Births", Percent;
        foreign_born_p: "DP02_0094PE", "Foreign-born Population", Percent;
        us_born_p: "DP02_0090PE", "US-born Population", Percent;
        grandparents_responsible_p: "DP02_0045PE", "Grandparents Responsible", Percent;
        american_ancestry_p: "DP02_0125PE", "American-ancestry Population", Percent;
    }
}

profile_record! {
    /// Employment, income, insurance, and commuting.
    EconomicRecord => Economic {
        employed_p: "DP03_0004PE", "Employed", Percent;
        unemployment_rate_p: "DP03_0009PE", "Unemployment Rate", Percent;
        mean_travel_time: "DP03_0025E", "Mean Travel Time to Work", Plain;
        management_occupations_p: "DP03_0027PE", "Management/Sci/Arts Occ.", Percent;
        construction_occupations_p: "DP03_0030PE", "Construction/Maint. Occ.", Percent;
        education_health_care_p: "DP03_0042PE", "Educational, Health Care Svcs", Percent;
        government_workers_p: "DP03_0048PE", "Government Workers", Percent;
        per_capita_income: "DP03_0088E", "Per capita Income", Currency;
        median_household_income: "DP03_0062E", "Median Household Income", Currency;
        mean_household_income: "DP03_0063E", "Mean Household Income", Currency;
        with_social_security_p: "DP03_0066PE", "With Social Security", Percent;
        with_snap_p: "DP03_0074PE", "With SNAP", Percent;
        with_health_insurance_p: "DP03_0096PE", "With Health Insurance", Percent;
        with_private_insurance_p: "DP03_0097PE", "With Private Insurance", Percent;
        with_public_coverage_p: "DP03_0098PE", "With Public Coverage", Percent;
        below_poverty_level_p: "DP03_0119PE", "Below Poverty Level", Percent;
        drove_alone_p: "DP03_0019PE", "Drove Alone", Percent;
        carpooled_p: "DP03_0020PE", "Carpooled", Percent;
        public_transportation_p: "DP03_0021PE", "Public Transportation", Percent;
        walked_to_work_p: "DP03_0022PE", "Walked to Work", Percent;
    }
}

profile_record! {
    /// Occupancy, structure, value, and housing costs.
    HousingRecord => Housing {
        total_housing_units: "DP04_0001E", "Total Housing Units", Number;
        occupied_p: "DP04_0002PE", "Occupied Housing Units", Percent;
        vacant_p: "DP04_0003PE", "Vacant Housing Units", Percent;
        owner_occupied_p: "DP04_0046PE", "Owner-Occupied", Percent;
        renter_occupied_p: "DP04_0047PE", "Renter-Occupied", Percent;
        avg_household_size_owner: "DP04_0048E", "Avg. Household Size (Owner)", Plain;
        avg_household_size_renter: "DP04_0049E", "Avg. Household Size (Renter)", Plain;
        one_unit_detached_p: "DP04_0007PE", "1-Unit, Detached", Percent;
        twenty_or_more_units_p: "DP04_0013PE", "20+ Units", Percent;
        built_2020_or_later_p: "DP04_0017PE", "Built 2020 or Later", Percent;
        three_bedrooms_p: "DP04_0042PE", "3 Bedrooms", Percent;
        crowded_p: "DP04_0079PE", "Occupants > 1.5/Room", Percent;
        median_value: "DP04_0089E", "Median Value", Currency;
        with_mortgage_p: "DP04_0091PE", "With Mortgage", Percent;
        median_monthly_costs_mortgage: "DP04_0101E", "Median Monthly Costs (Mortgage)", Currency;
        median_monthly_costs_no_mortgage: "DP04_0109E", "Median Monthly Costs (No Mort.)", Currency;
        median_gross_rent: "DP04_0134E", "Median Gross Rent", Currency;
        gross_rent_over_35_p: "DP04_0142PE", "Gross Rent > 35% of Income", Percent;
        no_vehicles_p: "DP04_0058PE", "No Vehicles", Percent;
        utility_gas_p: "DP04_0063PE", "Utility Gas", Percent;
    }
}

/// A decoded record of any category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProfileRecord {
    /// Overview statistics.
    Overview(OverviewRecord),
    /// Demographic statistics.
    Demographic(DemographicRecord),
    /// Social statistics.
    Social(SocialRecord),
    /// Economic statistics.
    Economic(EconomicRecord),
    /// Housing statistics.
    Housing(HousingRecord),
}

impl ProfileRecord {
    /// Decodes a projected response row into the record for `category`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the row length does not match the
    /// category's variable count plus the trailing FIPS cell.
    pub fn decode(category: Category, row: &[Option<String>]) -> Result<Self, DecodeError> {
        Ok(match category {
            Category::Overview => Self::Overview(OverviewRecord::decode(row)?),
            Category::Demographic => Self::Demographic(DemographicRecord::decode(row)?),
            Category::Social => Self::Social(SocialRecord::decode(row)?),
            Category::Economic => Self::Economic(EconomicRecord::decode(row)?),
            Category::Housing => Self::Housing(HousingRecord::decode(row)?),
        })
    }

    /// An empty record for `category`.
    #[must_use]
    pub fn placeholder(category: Category) -> Self {
        match category {
            Category::Overview => Self::Overview(OverviewRecord::placeholder()),
            Category::Demographic => Self::Demographic(DemographicRecord::placeholder()),
            Category::Social => Self::Social(SocialRecord::placeholder()),
            Category::Economic => Self::Economic(EconomicRecord::placeholder()),
            Category::Housing => Self::Housing(HousingRecord::placeholder()),
        }
    }

    /// The record's category.
    #[must_use]
    pub const fn category(&self) -> Category {
        match self {
            Self::Overview(_) => Category::Overview,
            Self::Demographic(_) => Category::Demographic,
            Self::Social(_) => Category::Social,
            Self::Economic(_) => Category::Economic,
            Self::Housing(_) => Category::Housing,
        }
    }

    /// The ordered field table for this record's category.
    #[must_use]
    pub const fn fields(&self) -> &'static [FieldSpec] {
        crate::variables::fields(self.category())
    }

    /// Field values in table order.
    #[must_use]
    pub fn values(&self) -> Vec<Option<&str>> {
        match self {
            Self::Overview(r) => r.values(),
            Self::Demographic(r) => r.values(),
            Self::Social(r) => r.values(),
            Self::Economic(r) => r.values(),
            Self::Housing(r) => r.values(),
        }
    }

    /// Looks up a value by field name (e.g. `"median_age"`).
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        let index = self.fields().iter().position(|spec| spec.field == field)?;
        self.values().get(index).copied().flatten()
    }

    /// The state FIPS echoed for the matched geography.
    #[must_use]
    pub fn state_fips(&self) -> Option<&str> {
        match self {
            Self::Overview(r) => r.state_fips.as_deref(),
            Self::Demographic(r) => r.state_fips.as_deref(),
            Self::Social(r) => r.state_fips.as_deref(),
            Self::Economic(r) => r.state_fips.as_deref(),
            Self::Housing(r) => r.state_fips.as_deref(),
        }
    }

    /// Pairs each field spec with its value, in table order.
    #[must_use]
    pub fn entries(&self) -> Vec<(&'static FieldSpec, Option<&str>)> {
        self.fields().iter().zip(self.values()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(len: usize) -> Vec<Option<String>> {
        (0..len).map(|i| Some(format!("v{i}"))).collect()
    }

    #[test]
    fn decodes_by_position_with_trailing_fips() {
        let mut cells = row(14);
        cells.push(Some("06".to_string()));

        let record = OverviewRecord::decode(&cells).unwrap();
        assert_eq!(record.total_population.as_deref(), Some("v0"));
        assert_eq!(record.median_age.as_deref(), Some("v1"));
        assert_eq!(record.median_gross_rent.as_deref(), Some("v13"));
        assert_eq!(record.state_fips.as_deref(), Some("06"));
    }

    #[test]
    fn every_field_matches_its_input_cell() {
        for category in Category::ALL {
            let width = crate::variables::fields(*category).len();
            let mut cells = row(width);
            cells.push(Some("36".to_string()));

            let record = ProfileRecord::decode(*category, &cells).unwrap();
            assert_eq!(record.category(), *category);
            for (i, value) in record.values().into_iter().enumerate() {
                assert_eq!(value, cells[i].as_deref(), "{category} field {i}");
            }
            assert_eq!(record.state_fips(), Some("36"));
        }
    }

    #[test]
    fn short_overview_row_is_rejected_not_shifted() {
        let cells = row(14);
        let err = OverviewRecord::decode(&cells).unwrap_err();
        assert_eq!(err.expected, 15);
        assert_eq!(err.actual, 14);
        assert_eq!(err.category, Category::Overview);
    }

    #[test]
    fn long_row_is_rejected() {
        let cells = row(22);
        assert!(ProfileRecord::decode(Category::Housing, &cells).is_err());
    }

    #[test]
    fn missing_cells_stay_unset() {
        let mut cells = row(20);
        cells[3] = None;
        cells.push(None);

        let record = EconomicRecord::decode(&cells).unwrap();
        assert_eq!(record.with_snap_p.as_deref(), Some("v11"));
        assert!(record.management_occupations_p.is_none());
        assert!(record.state_fips.is_none());
    }

    #[test]
    fn placeholder_has_every_field_unset() {
        for category in Category::ALL {
            let record = ProfileRecord::placeholder(*category);
            assert!(record.values().iter().all(Option::is_none));
            assert!(record.state_fips().is_none());
            assert_eq!(record.values().len(), record.fields().len());
        }
    }

    #[test]
    fn looks_up_values_by_field_name() {
        let mut cells = row(20);
        cells.push(Some("17".to_string()));
        let record = ProfileRecord::decode(Category::Demographic, &cells).unwrap();

        assert_eq!(record.value("median_age"), Some("v3"));
        assert_eq!(record.value("sex_ratio"), Some("v15"));
        assert_eq!(record.value("no_such_field"), None);
    }

    #[test]
    fn serializes_with_category_tag() {
        let record = ProfileRecord::placeholder(Category::Social);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["category"], "social");
        assert!(json["totalHouseholds"].is_null());
    }
}
