//! Interactive conversion loop
//!
//! Prompts for an amount, a base currency and a target currency, converts,
//! prints the result and starts over. Typing `end` (any case) at any prompt,
//! or closing stdin, ends the session.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::converter::Converter;
use crate::data::{ConversionRequest, CurrencyDirectory, ForexApi};
use crate::validation::canonical_amount;

/// Token that ends the session when typed at any prompt
pub const END_SENTINEL: &str = "end";

/// Which side of the conversion a currency prompt is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyRole {
    Base,
    Target,
}

impl CurrencyRole {
    fn label(self) -> &'static str {
        match self {
            CurrencyRole::Base => "base",
            CurrencyRole::Target => "target",
        }
    }
}

/// Returns true if `line` is the termination sentinel
pub fn is_end(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(END_SENTINEL)
}

/// Runs the prompt loop until the user ends the session.
///
/// Conversion failures are printed and the loop continues; only I/O errors on
/// the terminal itself are returned.
pub async fn run<A, R, W>(
    converter: &mut Converter<A>,
    currencies: &CurrencyDirectory,
    date: NaiveDate,
    input: &mut R,
    output: &mut W,
) -> io::Result<()>
where
    A: ForexApi,
    R: BufRead,
    W: Write,
{
    loop {
        let Some(amount) = prompt_amount(input, output)? else {
            return Ok(());
        };
        let Some(base) = prompt_currency(input, output, currencies, CurrencyRole::Base)? else {
            return Ok(());
        };
        let Some(target) = prompt_currency(input, output, currencies, CurrencyRole::Target)? else {
            return Ok(());
        };

        let request = ConversionRequest::new(date, &base, &target, amount);
        match converter.convert(&request).await {
            Ok(conversion) => writeln!(
                output,
                "{} {} is {} {}",
                request.amount, request.base, conversion.converted_amount, request.target
            )?,
            Err(e) => writeln!(output, "{}", e)?,
        }
    }
}

/// Prompts until a valid amount or the sentinel is entered.
///
/// Returns `Ok(None)` when the session should end.
pub fn prompt_amount<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> io::Result<Option<Decimal>> {
    loop {
        let Some(line) = read_prompt(input, output, "Please enter amount to convert: ")? else {
            return Ok(None);
        };
        if is_end(&line) {
            return Ok(None);
        }

        match canonical_amount(&line) {
            Some(amount) => return Ok(Some(amount)),
            None => writeln!(output, "Please enter a valid amount!")?,
        }
    }
}

/// Prompts until a supported currency code or the sentinel is entered.
///
/// Returns the code as stored in the directory, or `Ok(None)` when the
/// session should end.
pub fn prompt_currency<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    currencies: &CurrencyDirectory,
    role: CurrencyRole,
) -> io::Result<Option<String>> {
    let prompt = format!("Please enter {} currency: ", role.label());
    loop {
        let Some(line) = read_prompt(input, output, &prompt)? else {
            return Ok(None);
        };
        if is_end(&line) {
            return Ok(None);
        }

        match currencies.lookup(&line) {
            Some(code) => return Ok(Some(code.to_string())),
            None => writeln!(output, "Please enter a valid currency code!")?,
        }
    }
}

/// Writes `prompt` and reads one trimmed line; `None` at end of input.
fn read_prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> io::Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fake::{directory, FakeApi};
    use crate::history::ConversionRecorder;
    use std::io::Cursor;
    use std::str::FromStr;
    use tempfile::TempDir;

    const AMOUNT_PROMPT: &str = "Please enter amount to convert: ";
    const BASE_PROMPT: &str = "Please enter base currency: ";
    const TARGET_PROMPT: &str = "Please enter target currency: ";

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    async fn run_session(api: FakeApi, lines: &str) -> (String, Converter<FakeApi>, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let recorder = ConversionRecorder::new(temp_dir.path().join("conversion_data.json"));
        let mut converter = Converter::new(api, recorder);
        let mut input = Cursor::new(lines.as_bytes().to_vec());
        let mut output = Vec::new();

        run(&mut converter, &directory(), date(), &mut input, &mut output)
            .await
            .expect("Session I/O should succeed");

        (String::from_utf8(output).unwrap(), converter, temp_dir)
    }

    #[test]
    fn test_is_end_is_case_insensitive() {
        assert!(is_end("end"));
        assert!(is_end("END"));
        assert!(is_end("End\n"));
        assert!(!is_end("ending"));
        assert!(!is_end("not_end"));
    }

    #[test]
    fn test_prompt_amount_accepts_valid_input() {
        let mut input = Cursor::new(b"10.23\n".to_vec());
        let mut output = Vec::new();

        let amount = prompt_amount(&mut input, &mut output).unwrap();
        assert_eq!(amount, Some(Decimal::from_str("10.23").unwrap()));
    }

    #[test]
    fn test_prompt_amount_reprompts_on_invalid_input() {
        let mut input = Cursor::new(b"10.235\nabc\n7\n".to_vec());
        let mut output = Vec::new();

        let amount = prompt_amount(&mut input, &mut output).unwrap();
        assert_eq!(amount, Some(Decimal::from(7)));

        let text = String::from_utf8(output).unwrap();
        assert_eq!(text.matches("Please enter a valid amount!").count(), 2);
        assert_eq!(text.matches(AMOUNT_PROMPT).count(), 3);
    }

    #[test]
    fn test_prompt_currency_base_and_target() {
        let currencies = directory();
        let mut output = Vec::new();

        let mut input = Cursor::new(b"eur\n".to_vec());
        let base = prompt_currency(&mut input, &mut output, &currencies, CurrencyRole::Base).unwrap();
        assert_eq!(base.as_deref(), Some("EUR"));

        let mut input = Cursor::new(b"usd\n".to_vec());
        let target =
            prompt_currency(&mut input, &mut output, &currencies, CurrencyRole::Target).unwrap();
        assert_eq!(target.as_deref(), Some("USD"));

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains(BASE_PROMPT));
        assert!(text.contains(TARGET_PROMPT));
    }

    #[test]
    fn test_prompt_currency_rejects_unknown_codes() {
        let mut input = Cursor::new(b"xyz\nUsD\n".to_vec());
        let mut output = Vec::new();

        let code =
            prompt_currency(&mut input, &mut output, &directory(), CurrencyRole::Base).unwrap();
        assert_eq!(code.as_deref(), Some("USD"));
        assert!(String::from_utf8(output)
            .unwrap()
            .contains("Please enter a valid currency code!"));
    }

    #[test]
    fn test_prompt_eof_ends_session() {
        let mut input = Cursor::new(Vec::new());
        let mut output = Vec::new();
        assert_eq!(prompt_amount(&mut input, &mut output).unwrap(), None);
    }

    #[tokio::test]
    async fn test_end_at_amount_prompt_stops_immediately() {
        let (output, converter, _temp_dir) = run_session(FakeApi::new(Decimal::ONE), "END\n10\n").await;

        assert_eq!(output, AMOUNT_PROMPT);
        assert_eq!(converter.api().convert_calls(), 0);
    }

    #[tokio::test]
    async fn test_end_at_base_prompt_stops_immediately() {
        let (output, converter, _temp_dir) = run_session(FakeApi::new(Decimal::ONE), "10\nend\nusd\n").await;

        assert_eq!(output, format!("{AMOUNT_PROMPT}{BASE_PROMPT}"));
        assert_eq!(converter.api().convert_calls(), 0);
    }

    #[tokio::test]
    async fn test_end_at_target_prompt_stops_immediately() {
        let (output, converter, _temp_dir) =
            run_session(FakeApi::new(Decimal::ONE), "10\nusd\nEnd\n").await;

        assert_eq!(output, format!("{AMOUNT_PROMPT}{BASE_PROMPT}{TARGET_PROMPT}"));
        assert_eq!(converter.api().convert_calls(), 0);
    }

    #[tokio::test]
    async fn test_full_conversion_prints_result() {
        let api = FakeApi::new(Decimal::from_str("0.5").unwrap());
        let (output, converter, _temp_dir) = run_session(api, "10.23\nbgn\neur\nend\n").await;

        assert!(output.contains("10.23 BGN is 5.115 EUR"), "Unexpected output: {output}");
        assert_eq!(converter.api().convert_calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_conversion_uses_cache() {
        let api = FakeApi::new(Decimal::TWO);
        let (output, converter, _temp_dir) =
            run_session(api, "10\nusd\neur\n10.0\nUSD\nEUR\nend\n").await;

        assert_eq!(output.matches("10 USD is 20 EUR").count(), 2);
        assert_eq!(converter.api().convert_calls(), 1);
    }

    #[tokio::test]
    async fn test_conversion_error_is_printed_and_loop_continues() {
        let (output, converter, _temp_dir) =
            run_session(FakeApi::failing(500), "10\nusd\neur\nend\n").await;

        assert!(output.contains("Error: 500"));
        assert!(output.ends_with(AMOUNT_PROMPT), "Should return to the amount prompt");
        assert_eq!(converter.api().convert_calls(), 1);
    }
}
