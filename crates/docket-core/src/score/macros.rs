//! Declarative macros for the tiered score boilerplate.
//!
//! These generate the field-wise arithmetic and the slash-separated text
//! format shared by the tier tuples in this module.

/// Generates `PartialOrd`, `Add`, `AddAssign`, `Sub` and `Neg` for a
/// field-based tier tuple.
///
/// The constructor must accept fields in the order they are listed.
///
/// # Usage
/// ```ignore
/// impl_tier_ops!(ScoreBreakdown { hard, medium, soft } => of);
/// ```
macro_rules! impl_tier_ops {
    ($type:ident { $($field:ident),+ } => $ctor:ident) => {
        impl PartialOrd for $type {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }

        impl std::ops::Add for $type {
            type Output = Self;

            fn add(self, other: Self) -> Self {
                $type::$ctor( $(self.$field + other.$field),+ )
            }
        }

        impl std::ops::AddAssign for $type {
            fn add_assign(&mut self, other: Self) {
                $( self.$field += other.$field; )+
            }
        }

        impl std::ops::Sub for $type {
            type Output = Self;

            fn sub(self, other: Self) -> Self {
                $type::$ctor( $(self.$field - other.$field),+ )
            }
        }

        impl std::ops::Neg for $type {
            type Output = Self;

            fn neg(self) -> Self {
                $type::$ctor( $(-self.$field),+ )
            }
        }
    };
}

/// Generates `FromStr` and a `to_string_repr` method for tier tuples using
/// the `"Xsuffix/Ysuffix/..."` format.
///
/// # Usage
/// ```ignore
/// impl_tier_parse!(ScoreBreakdown { hard => "hard", medium => "medium", soft => "soft" } => of);
/// ```
macro_rules! impl_tier_parse {
    ($type:ident { $($field:ident => $suffix:literal),+ } => $ctor:ident) => {
        impl std::str::FromStr for $type {
            type Err = $crate::score::ScoreParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                let parts: Vec<&str> = s.split('/').collect();
                let suffixes: &[&str] = &[ $($suffix),+ ];
                let count = suffixes.len();

                if parts.len() != count {
                    return Err($crate::score::ScoreParseError {
                        message: format!(
                            "Invalid {} format '{}': expected {} parts separated by '/'",
                            stringify!($type), s, count
                        ),
                    });
                }

                let mut _idx = 0usize;
                $(
                    let $field = {
                        let part = parts[_idx].trim();
                        let num_str = part.strip_suffix($suffix).ok_or_else(|| {
                            $crate::score::ScoreParseError {
                                message: format!(
                                    "{} part '{}' must end with '{}'",
                                    stringify!($field), part, $suffix
                                ),
                            }
                        })?;
                        let val = num_str.parse::<i64>().map_err(|e| {
                            $crate::score::ScoreParseError {
                                message: format!(
                                    "Invalid {} count '{}': {}",
                                    $suffix, num_str, e
                                ),
                            }
                        })?;
                        _idx += 1;
                        val
                    };
                )+

                Ok($type::$ctor( $($field),+ ))
            }
        }

        impl $type {
            /// Returns the slash-separated text form, e.g. `0hard/3medium/12soft`.
            pub fn to_string_repr(&self) -> String {
                let mut parts = Vec::new();
                $(
                    parts.push(format!("{}{}", self.$field, $suffix));
                )+
                parts.join("/")
            }
        }
    };
}

// Macros are used via #[macro_use] on the module declaration.
