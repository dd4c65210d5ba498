// kedai_server/src/models/money.rs

//! Exact decimal amounts stored as canonical decimal text.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo, SqliteValueRef};
use sqlx::{Decode, Encode, Type};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(pub Decimal);

impl Money {
  pub fn amount(self) -> Decimal {
    self.0
  }
}

impl From<Decimal> for Money {
  fn from(amount: Decimal) -> Self {
    Money(amount)
  }
}

impl fmt::Display for Money {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.0.fmt(f)
  }
}

impl Type<Sqlite> for Money {
  fn type_info() -> SqliteTypeInfo {
    <String as Type<Sqlite>>::type_info()
  }

  // Rows written by other tools may carry numeric affinity.
  fn compatible(ty: &SqliteTypeInfo) -> bool {
    <String as Type<Sqlite>>::compatible(ty)
      || <i64 as Type<Sqlite>>::compatible(ty)
      || <f64 as Type<Sqlite>>::compatible(ty)
  }
}

impl<'q> Encode<'q, Sqlite> for Money {
  fn encode_by_ref(
    &self,
    buf: &mut <Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
  ) -> Result<IsNull, BoxDynError> {
    <String as Encode<'q, Sqlite>>::encode(self.0.normalize().to_string(), buf)
  }
}

impl<'r> Decode<'r, Sqlite> for Money {
  fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
    let text = <&str as Decode<'r, Sqlite>>::decode(value)?;
    Ok(Money(Decimal::from_str(text.trim())?))
  }
}
