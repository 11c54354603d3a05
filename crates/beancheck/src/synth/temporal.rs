//! Date/time rules
//!
//! Points in time are "now"; amounts of time are 1337 days.

use beancheck_reflect::{lang, Temporal, TypeDescriptor, Value};
use chrono::{DateTime, FixedOffset, Local, Utc};

use super::rules::{BasicTypeRule, INTEGRAL_VALUE};

fn exact<F>(name: &str, target: TypeDescriptor, make: F) -> BasicTypeRule
where
    F: Fn() -> Temporal + Send + Sync + 'static,
{
    BasicTypeRule::new(
        name,
        move |ty, _| *ty == target,
        move |_, _| Ok(Value::Temporal(make())),
    )
}

fn now_with_offset() -> DateTime<FixedOffset> {
    Local::now().into()
}

pub(crate) fn rules() -> Vec<BasicTypeRule> {
    let days = INTEGRAL_VALUE;
    vec![
        exact("date", lang::date(), || Temporal::Instant(Utc::now())),
        exact("calendar", lang::calendar(), || {
            Temporal::Calendar(now_with_offset())
        }),
        exact("local-date", lang::local_date(), || {
            Temporal::LocalDate(Local::now().date_naive())
        }),
        exact("local-time", lang::local_time(), || {
            Temporal::LocalTime(Local::now().time())
        }),
        exact("local-date-time", lang::local_date_time(), || {
            Temporal::LocalDateTime(Local::now().naive_local())
        }),
        exact("zoned-date-time", lang::zoned_date_time(), || {
            Temporal::ZonedDateTime(now_with_offset())
        }),
        exact("offset-time", lang::offset_time(), || {
            let now = now_with_offset();
            Temporal::OffsetTime(now.time(), *now.offset())
        }),
        exact("period", lang::period(), move || Temporal::Period(days)),
        exact("duration", lang::duration(), move || {
            Temporal::Duration(chrono::Duration::days(days as i64))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use beancheck_reflect::TypeCatalog;

    fn generate(ty: &TypeDescriptor) -> Value {
        let catalog = TypeCatalog::new();
        rules()
            .into_iter()
            .find(|rule| rule.matches(ty, &catalog))
            .unwrap()
            .generate(ty, &catalog)
            .unwrap()
    }

    #[test]
    fn test_amounts_are_1337_days() {
        assert_eq!(generate(&lang::period()), Value::Temporal(Temporal::Period(1337)));
        assert_eq!(
            generate(&lang::duration()),
            Value::Temporal(Temporal::Duration(chrono::Duration::days(1337)))
        );
    }

    #[test]
    fn test_points_in_time_are_recent() {
        let before = Utc::now();
        match generate(&lang::date()) {
            Value::Temporal(Temporal::Instant(instant)) => assert!(instant >= before),
            other => panic!("expected instant, got {}", other),
        }
        for ty in [
            lang::calendar(),
            lang::local_date(),
            lang::local_time(),
            lang::local_date_time(),
            lang::zoned_date_time(),
            lang::offset_time(),
        ] {
            let value = generate(&ty);
            assert!(value.conforms_to(&ty), "{} does not conform to {}", value, ty);
        }
    }
}
