use chrono::NaiveDate;
use serde_json::Value;

pub const INVALID_DATE: &str = "invalid date";
pub const NOT_AVAILABLE: &str = "Not available";

/// Largest amount whose cents are still exact in an `f64`. Larger amounts
/// are shown as recorded.
pub const MAX_CURRENCY_AMOUNT: f64 = 9e13;

/// Snapshot keys that never reach the screen, at any nesting level.
pub static EXCLUDED_FIELDS: &[&str] = &[
    "senha",
    "adm",
    "id",
    "isSenhaRedefinida",
    "tokenRedefinicao",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    YesNo,
    Currency,
    Date,
    AdminType,
}

pub struct FieldFormat {
    pub key: &'static str,
    pub label: &'static str,
    pub transform: Transform,
}

pub static FIELD_FORMATS: &[FieldFormat] = &[
    FieldFormat {
        key: "referenciaProjeto",
        label: "Project Reference",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "nome",
        label: "Name",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "email",
        label: "E-mail",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "cpf",
        label: "Tax ID",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "telefone",
        label: "Phone",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "empresa",
        label: "Company",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "objeto",
        label: "Object",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "descricao",
        label: "Description",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "coordenador",
        label: "Coordinator",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "ocultarValor",
        label: "Value hidden",
        transform: Transform::YesNo,
    },
    FieldFormat {
        key: "ocultarEmpresa",
        label: "Company hidden",
        transform: Transform::YesNo,
    },
    FieldFormat {
        key: "valor",
        label: "Amount",
        transform: Transform::Currency,
    },
    FieldFormat {
        key: "dataInicio",
        label: "Start Date",
        transform: Transform::Date,
    },
    FieldFormat {
        key: "dataTermino",
        label: "End Date",
        transform: Transform::Date,
    },
    FieldFormat {
        key: "dataCadastro",
        label: "Registration Date",
        transform: Transform::Date,
    },
    FieldFormat {
        key: "situacao",
        label: "Status",
        transform: Transform::Identity,
    },
    FieldFormat {
        key: "ativo",
        label: "Active",
        transform: Transform::YesNo,
    },
    FieldFormat {
        key: "tipo",
        label: "Type",
        transform: Transform::AdminType,
    },
];

pub fn is_excluded(key: &str) -> bool {
    EXCLUDED_FIELDS.contains(&key)
}

pub fn field_format(key: &str) -> Option<&'static FieldFormat> {
    FIELD_FORMATS.iter().find(|f| f.key == key)
}

/// Display label for a snapshot key; unknown keys are shown verbatim.
pub fn label_for(key: &str) -> &str {
    field_format(key).map(|f| f.label).unwrap_or(key)
}

pub fn format_value(key: &str, value: &Value) -> String {
    field_format(key)
        .map(|f| f.transform)
        .unwrap_or(Transform::Identity)
        .apply(value)
}

impl Transform {
    pub fn apply(self, value: &Value) -> String {
        if value.is_null() {
            return NOT_AVAILABLE.to_string();
        }
        match self {
            Self::Identity => display_value(value),
            Self::YesNo => yes_no(truthy(value)).to_string(),
            Self::Currency => match amount(value) {
                Some(amount) => format_currency(amount),
                None => display_value(value),
            },
            Self::Date => match value {
                Value::String(raw) => format_date(raw),
                _ => INVALID_DATE.to_string(),
            },
            Self::AdminType => {
                if display_value(value) == "1" {
                    "Super Admin".to_string()
                } else {
                    "Regular Admin".to_string()
                }
            }
        }
    }
}

/// Printable form of a raw value. Strings lose their JSON quotes, including
/// strings that were themselves stored as an encoded JSON string literal.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::String(text) => unquote(text),
        other => other.to_string(),
    }
}

fn unquote(text: &str) -> String {
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        if let Ok(inner) = serde_json::from_str::<String>(text) {
            return inner;
        }
    }
    text.to_string()
}

/// `YYYY-MM-DD` (optionally followed by a time part) to `DD/MM/YYYY`.
/// Anything else yields [`INVALID_DATE`].
pub fn format_date(raw: &str) -> String {
    if !raw.contains('-') {
        return INVALID_DATE.to_string();
    }
    let day = raw.split(|c| c == 'T' || c == ' ').next().unwrap_or(raw);
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => INVALID_DATE.to_string(),
    }
}

/// Brazilian real notation: `R$ 1.234,56`. Expects `|amount|` within
/// [`MAX_CURRENCY_AMOUNT`].
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let units = (cents / 100).to_string();

    let mut grouped = String::with_capacity(units.len() + units.len() / 3);
    for (i, ch) in units.chars().enumerate() {
        if i > 0 && (units.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

fn amount(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite() && v.abs() <= MAX_CURRENCY_AMOUNT)
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn formats_iso_dates() {
        assert_eq!(format_date("2024-03-07"), "07/03/2024");
        assert_eq!(format_date("2024-03-07T09:15:00"), "07/03/2024");
        assert_eq!(format_date("2024-03-07 09:15:00"), "07/03/2024");
    }

    #[test]
    fn malformed_dates_become_marker() {
        assert_eq!(format_date("not-a-date"), INVALID_DATE);
        assert_eq!(format_date("20240307"), INVALID_DATE);
        assert_eq!(format_date("2024-02-30"), INVALID_DATE);
        assert_eq!(format_value("dataInicio", &json!(20240307)), INVALID_DATE);
    }

    #[test]
    fn formats_currency() {
        assert_eq!(format_currency(800.0), "R$ 800,00");
        assert_eq!(format_currency(1000.0), "R$ 1.000,00");
        assert_eq!(format_currency(1234567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(0.5), "R$ 0,50");
        assert_eq!(format_currency(-42.1), "-R$ 42,10");
        assert_eq!(format_value("valor", &json!("1500.5")), "R$ 1.500,50");
        assert_eq!(format_value("valor", &json!("a combinar")), "a combinar");
    }

    #[test]
    fn out_of_range_amounts_are_shown_as_recorded() {
        assert_eq!(
            format_value("valor", &json!("250000000000000000000")),
            "250000000000000000000"
        );
        assert_eq!(
            format_value("valor", &json!(90_000_000_000_000u64)),
            "R$ 90.000.000.000.000,00"
        );
        assert_eq!(format_value("valor", &json!("-1e15")), "-1e15");
    }

    #[test]
    fn boolean_flags_read_yes_or_no() {
        assert_eq!(label_for("ocultarValor"), "Value hidden");
        assert_eq!(format_value("ocultarValor", &json!(true)), "Yes");
        assert_eq!(format_value("ocultarValor", &json!(false)), "No");
        assert_eq!(format_value("ativo", &json!(0)), "No");
        assert_eq!(format_value("ocultarEmpresa", &json!("x")), "Yes");
    }

    #[test]
    fn admin_type_distinguishes_super_admins() {
        assert_eq!(format_value("tipo", &json!("1")), "Super Admin");
        assert_eq!(format_value("tipo", &json!(1)), "Super Admin");
        assert_eq!(format_value("tipo", &json!("2")), "Regular Admin");
    }

    #[test]
    fn unknown_keys_fall_back_to_identity() {
        assert_eq!(label_for("orcamento"), "orcamento");
        assert_eq!(format_value("orcamento", &json!("\"quoted\"")), "quoted");
        assert_eq!(format_value("orcamento", &json!(12.5)), "12.5");
        assert_eq!(format_value("orcamento", &json!([1, "a"])), r#"[1,"a"]"#);
        assert_eq!(format_value("nome", &Value::Null), NOT_AVAILABLE);
    }

    #[test]
    fn exclusion_list_covers_sensitive_keys() {
        for key in ["senha", "adm", "id", "isSenhaRedefinida", "tokenRedefinicao"] {
            assert!(is_excluded(key), "{key} should be excluded");
        }
        assert!(!is_excluded("nome"));
    }
}
