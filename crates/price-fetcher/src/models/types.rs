use std::borrow::Cow;

/// Source identifier - mostly static constants ("EXCHANGE_RATE", "COINMARKETCAP")
pub type ProviderId = Cow<'static, str>;
