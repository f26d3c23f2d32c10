//! Question bank construction.
//!
//! Each optional field of the analysis contributes at most one question and
//! absent fields contribute none, so a quiz never asks about data the learner
//! was not shown. The price-direction question is always present. Every
//! question is built with its correct option first; shuffling happens later.

use analysis_core::{AnalysisRecord, PriceDirection};

use crate::error::LearningError;
use crate::types::{QuestionTopic, QuizQuestion};

const DIRECTION_INCREASED: &str = "Increased in value";
const DIRECTION_DECREASED: &str = "Decreased in value";
const DIRECTION_UNCHANGED: &str = "Stayed exactly the same";
const DIRECTION_UNKNOWN: &str = "We do not know from the data";

const VOL_LOW: &str = "Low volatility (below 15% a year)";
const VOL_MODERATE: &str = "Moderate volatility (15% to 30% a year)";
const VOL_HIGH: &str = "High volatility (above 30% a year)";
const VOL_DECOY: &str = "It cannot be judged without earnings data";

/// Annualized volatility band edges, in percent
const LOW_VOL_CEILING: f64 = 15.0;
const MODERATE_VOL_CEILING: f64 = 30.0;

const CAP_MEGA: &str = "Mega cap (above $200B)";
const CAP_LARGE: &str = "Large cap ($10B to $200B)";
const CAP_MID: &str = "Mid cap ($2B to $10B)";
const CAP_SMALL: &str = "Small cap (below $2B)";

const BETA_MORE: &str = "More than the overall market";
const BETA_IN_LINE: &str = "About in line with the overall market";
const BETA_LESS: &str = "Less than the overall market";
const BETA_OPPOSITE: &str = "In the opposite direction to the overall market";

const COMMON_SECTORS: &[&str] = &[
    "Technology",
    "Healthcare",
    "Financial Services",
    "Energy",
    "Consumer Cyclical",
    "Industrials",
    "Utilities",
];

const COMMON_INDUSTRIES: &[&str] = &[
    "Software - Infrastructure",
    "Banks - Diversified",
    "Oil & Gas Integrated",
    "Drug Manufacturers - General",
    "Restaurants",
    "Aerospace & Defense",
];

/// Collects questions, skipping those whose source field is absent.
struct BankBuilder {
    questions: Vec<QuizQuestion>,
}

impl BankBuilder {
    fn new() -> Self {
        Self { questions: Vec::new() }
    }

    fn push(&mut self, question: Result<QuizQuestion, LearningError>) -> Result<(), LearningError> {
        self.questions.push(question?);
        Ok(())
    }

    fn push_if_present<T>(
        &mut self,
        field: Option<T>,
        build: impl FnOnce(T) -> Result<QuizQuestion, LearningError>,
    ) -> Result<(), LearningError> {
        match field {
            Some(value) => self.push(build(value)),
            None => Ok(()),
        }
    }

    fn finish(self) -> Vec<QuizQuestion> {
        self.questions
    }
}

/// Build the full, unshuffled question pool for an analysis.
pub fn build_question_bank(analysis: &AnalysisRecord) -> Result<Vec<QuizQuestion>, LearningError> {
    let metrics = &analysis.metrics;
    let fundamentals = &analysis.fundamentals;
    let mut bank = BankBuilder::new();

    bank.push(price_direction_question(analysis))?;
    bank.push_if_present(metrics.daily_volatility_pct, daily_volatility_question)?;
    bank.push_if_present(metrics.annualized_volatility_pct, |v| volatility_level_question(analysis, v))?;
    bank.push_if_present(metrics.max_drawdown_pct, max_drawdown_question)?;
    bank.push_if_present(metrics.mean_daily_return_pct, |m| mean_return_question(analysis, m))?;
    bank.push_if_present(fundamentals.sector.as_deref(), |s| sector_question(analysis, s))?;
    bank.push_if_present(fundamentals.industry.as_deref(), |i| industry_question(analysis, i))?;
    bank.push_if_present(fundamentals.market_cap, |c| market_cap_question(analysis, c))?;
    bank.push_if_present(fundamentals.trailing_pe, |p| trailing_pe_question(analysis, p))?;
    bank.push_if_present(fundamentals.forward_pe, |p| forward_pe_question(analysis, p))?;
    bank.push_if_present(fundamentals.dividend_yield, |y| dividend_yield_question(analysis, y))?;
    bank.push_if_present(fundamentals.beta, |b| beta_question(analysis, b))?;

    Ok(bank.finish())
}

/// Correct label first, then the remaining labels of the same domain in order.
fn category_options(correct: &'static str, domain: &[&'static str]) -> (String, Vec<&'static str>) {
    let decoys = domain.iter().copied().filter(|label| *label != correct).collect();
    (correct.to_string(), decoys)
}

fn price_direction_question(analysis: &AnalysisRecord) -> Result<QuizQuestion, LearningError> {
    let m = &analysis.metrics;
    let correct = match m.direction() {
        PriceDirection::Increased => DIRECTION_INCREASED,
        PriceDirection::Decreased => DIRECTION_DECREASED,
        PriceDirection::Unchanged => DIRECTION_UNCHANGED,
    };
    let (correct, decoys) = category_options(
        correct,
        &[DIRECTION_INCREASED, DIRECTION_DECREASED, DIRECTION_UNCHANGED, DIRECTION_UNKNOWN],
    );

    let movement = format!(
        "The closing price went from {:.2} to {:.2} over the {} period.",
        m.start_price, m.last_price, analysis.period
    );
    let explanation = match m.period_return_pct {
        Some(ret) => format!(
            "{} The total period return is {:.2}%. A positive value means the price increased; a negative value means it decreased.",
            movement, ret
        ),
        None => movement,
    };

    QuizQuestion::with_correct_first(
        QuestionTopic::PriceDirection,
        format!("Over the selected period, the price of {} has:", analysis.ticker),
        correct,
        &decoys,
        explanation,
    )
}

fn daily_volatility_question(daily_vol: f64) -> Result<QuizQuestion, LearningError> {
    QuizQuestion::with_correct_first(
        QuestionTopic::DailyVolatility,
        format!("A daily volatility of about {:.2}% describes:", daily_vol),
        "How much the price typically moves from one day to the next.",
        &[
            "The profit the stock is guaranteed to make each day.",
            "The largest loss the stock can ever have in a single day.",
            "The share of earnings paid out as dividends each day.",
        ],
        format!(
            "Daily volatility is the standard deviation of daily returns, here {:.2}%. \
             It measures the typical size of day-to-day price swings, not a promised gain or a loss limit.",
            daily_vol
        ),
    )
}

fn volatility_band(annualized_vol: f64) -> &'static str {
    if annualized_vol < LOW_VOL_CEILING {
        VOL_LOW
    } else if annualized_vol < MODERATE_VOL_CEILING {
        VOL_MODERATE
    } else {
        VOL_HIGH
    }
}

fn volatility_level_question(analysis: &AnalysisRecord, annualized_vol: f64) -> Result<QuizQuestion, LearningError> {
    let band = volatility_band(annualized_vol);
    let (correct, decoys) = category_options(band, &[VOL_LOW, VOL_MODERATE, VOL_HIGH, VOL_DECOY]);

    QuizQuestion::with_correct_first(
        QuestionTopic::VolatilityLevel,
        format!(
            "{} has an annualized volatility of about {:.1}%. How would you classify that?",
            analysis.ticker, annualized_vol
        ),
        correct,
        &decoys,
        format!(
            "Annualized volatility scales daily volatility by the square root of 252 trading days. \
             At {:.1}% it falls in the {} band: the higher the figure, the larger and more frequent the price swings.",
            annualized_vol,
            band.to_lowercase()
        ),
    )
}

fn max_drawdown_question(max_dd: f64) -> Result<QuizQuestion, LearningError> {
    QuizQuestion::with_correct_first(
        QuestionTopic::MaxDrawdown,
        format!("If the maximum drawdown is about {:.1}%, what does that describe?", max_dd),
        "The worst peak-to-trough price drop over the period.",
        &[
            "The average daily price movement.",
            "The annual return expected every year.",
            "The dividend yield paid each year.",
        ],
        format!(
            "Over this period the worst fall from a previous high was {:.1}%. \
             Drawdown is the percentage fall from a previous high to a later low. \
             It helps you understand how painful a bad period could feel.",
            max_dd
        ),
    )
}

fn mean_return_question(analysis: &AnalysisRecord, mean_ret: f64) -> Result<QuizQuestion, LearningError> {
    let returns = analysis.metrics.observations.saturating_sub(1);
    QuizQuestion::with_correct_first(
        QuestionTopic::MeanDailyReturn,
        format!(
            "The average daily return of {} over the period was about {:.3}%. What does this number tell you?",
            analysis.ticker, mean_ret
        ),
        "The typical direction and size of a day's price change, on average.",
        &[
            "The exact return you will earn tomorrow.",
            "The total return over the whole period.",
            "How far the price fell from its peak.",
        ],
        format!(
            "Averaging the {} daily returns gives {:.3}% per day. It hints at the drift of the price \
             but says nothing certain about any single future day, so read it alongside volatility and drawdown.",
            returns, mean_ret
        ),
    )
}

fn sector_question(analysis: &AnalysisRecord, sector: &str) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    QuizQuestion::with_correct_first(
        QuestionTopic::Sector,
        format!("Which sector does {} belong to?", name),
        sector,
        COMMON_SECTORS,
        format!(
            "{} is classified in the {} sector. Sectors group companies by the kind of business they run, \
             which helps when comparing a stock with its peers.",
            name, sector
        ),
    )
}

fn industry_question(analysis: &AnalysisRecord, industry: &str) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    QuizQuestion::with_correct_first(
        QuestionTopic::Industry,
        format!("Which industry does {} operate in?", name),
        industry,
        COMMON_INDUSTRIES,
        format!(
            "{} operates in the {} industry. An industry is a narrower grouping than a sector \
             and lists the company's closest competitors.",
            name, industry
        ),
    )
}

fn market_cap_class(market_cap: f64) -> &'static str {
    if market_cap >= 200e9 {
        CAP_MEGA
    } else if market_cap >= 10e9 {
        CAP_LARGE
    } else if market_cap >= 2e9 {
        CAP_MID
    } else {
        CAP_SMALL
    }
}

/// Human-readable dollar amount: $3.40T, $12.50B, $850.00M
pub fn format_amount(value: f64) -> String {
    let abs = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };
    if abs >= 1e12 {
        format!("{}${:.2}T", sign, abs / 1e12)
    } else if abs >= 1e9 {
        format!("{}${:.2}B", sign, abs / 1e9)
    } else if abs >= 1e6 {
        format!("{}${:.2}M", sign, abs / 1e6)
    } else {
        format!("{}${:.0}", sign, abs)
    }
}

fn market_cap_question(analysis: &AnalysisRecord, market_cap: f64) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    let class = market_cap_class(market_cap);
    let amount = format_amount(market_cap);
    let (correct, decoys) = category_options(class, &[CAP_MEGA, CAP_LARGE, CAP_MID, CAP_SMALL]);

    QuizQuestion::with_correct_first(
        QuestionTopic::MarketCap,
        format!("With a market capitalization of about {}, {} is best described as:", amount, name),
        correct,
        &decoys,
        format!(
            "Market capitalization is the share price times the number of shares outstanding. \
             At about {}, {} counts as {}.",
            amount,
            name,
            class.to_lowercase()
        ),
    )
}

fn trailing_pe_question(analysis: &AnalysisRecord, pe: f64) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    QuizQuestion::with_correct_first(
        QuestionTopic::TrailingPe,
        format!("{} has a trailing P/E ratio of about {:.1}. What does that mean?", name, pe),
        format!(
            "Investors pay about {:.1} times the company's earnings per share from the last 12 months.",
            pe
        ),
        &[
            "The stock will return that percentage every year.",
            "The company pays that many dollars in dividends per share.",
            "The stock price has risen that much over the past year.",
        ],
        format!(
            "The trailing P/E divides the share price by the last 12 months of earnings per share. \
             At {:.1}, each dollar of past annual earnings costs about ${:.2} in share price.",
            pe, pe
        ),
    )
}

fn forward_pe_question(analysis: &AnalysisRecord, pe: f64) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    QuizQuestion::with_correct_first(
        QuestionTopic::ForwardPe,
        format!("{}'s forward P/E is about {:.1}. Which earnings does a forward P/E use?", name, pe),
        "Analysts' expected earnings over the next 12 months.",
        &[
            "Earnings reported over the past 12 months.",
            "Dividends paid over the past year.",
            "The company's total revenue.",
        ],
        format!(
            "A forward P/E divides today's share price by the earnings per share analysts expect \
             over the coming year. For {} that ratio is about {:.1}.",
            name, pe
        ),
    )
}

fn dividend_yield_question(analysis: &AnalysisRecord, dividend_yield: f64) -> Result<QuizQuestion, LearningError> {
    let name = analysis.company_name();
    QuizQuestion::with_correct_first(
        QuestionTopic::DividendYield,
        format!("{} has a dividend yield of about {:.2}%. What does this tell you?", name, dividend_yield),
        "Annual dividends per share relative to the share price.",
        &[
            "How much the share price rose over the year.",
            "The company's profit margin.",
            "The interest rate the company pays on its debt.",
        ],
        format!(
            "Dividend yield is annual dividends per share divided by the share price. \
             At {:.2}%, every 100 invested at today's price would pay about {:.2} in dividends a year.",
            dividend_yield, dividend_yield
        ),
    )
}

fn beta_class(beta: f64) -> &'static str {
    if beta < 0.0 {
        BETA_OPPOSITE
    } else if beta < 0.95 {
        BETA_LESS
    } else if beta <= 1.05 {
        BETA_IN_LINE
    } else {
        BETA_MORE
    }
}

fn beta_question(analysis: &AnalysisRecord, beta: f64) -> Result<QuizQuestion, LearningError> {
    let class = beta_class(beta);
    let (correct, decoys) = category_options(class, &[BETA_MORE, BETA_IN_LINE, BETA_LESS, BETA_OPPOSITE]);

    QuizQuestion::with_correct_first(
        QuestionTopic::Beta,
        format!("A beta of about {:.2} means {} has historically moved:", beta, analysis.ticker),
        correct,
        &decoys,
        format!(
            "Beta compares a stock's moves with the market's: 1.0 means in step with the market, \
             above 1 means bigger swings, below 1 smaller ones, and below 0 the opposite direction. \
             A beta of {:.2} means {} has moved {}.",
            beta,
            analysis.ticker,
            class.to_lowercase()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::{FundamentalsSnapshot, MetricsRecord};
    use chrono::Utc;

    fn metrics() -> MetricsRecord {
        MetricsRecord {
            last_price: 121.0,
            start_price: 100.0,
            period_return_pct: Some(21.0),
            daily_volatility_pct: Some(1.4),
            annualized_volatility_pct: Some(22.2),
            max_drawdown_pct: Some(-10.0),
            mean_daily_return_pct: Some(0.08),
            min_price: 99.0,
            max_price: 121.0,
            observations: 252,
        }
    }

    fn full_fundamentals() -> FundamentalsSnapshot {
        FundamentalsSnapshot {
            ticker: Some("AAPL".into()),
            short_name: Some("Apple Inc.".into()),
            long_name: Some("Apple Inc.".into()),
            sector: Some("Technology".into()),
            industry: Some("Consumer Electronics".into()),
            market_cap: Some(3.4e12),
            trailing_pe: Some(35.2),
            forward_pe: Some(29.8),
            dividend_yield: Some(0.44),
            beta: Some(1.24),
            currency: Some("USD".into()),
            exchange: Some("NMS".into()),
            country: Some("United States".into()),
        }
    }

    fn record(metrics: MetricsRecord, fundamentals: FundamentalsSnapshot) -> AnalysisRecord {
        AnalysisRecord {
            ticker: "AAPL".into(),
            as_of: Utc::now(),
            period: "1y".into(),
            interval: "1d".into(),
            fundamentals,
            metrics,
        }
    }

    fn topics(bank: &[QuizQuestion]) -> Vec<QuestionTopic> {
        bank.iter().map(|q| q.topic()).collect()
    }

    #[test]
    fn test_full_record_yields_twelve_questions() {
        let bank = build_question_bank(&record(metrics(), full_fundamentals())).unwrap();
        assert_eq!(bank.len(), 12);
        assert_eq!(
            topics(&bank),
            vec![
                QuestionTopic::PriceDirection,
                QuestionTopic::DailyVolatility,
                QuestionTopic::VolatilityLevel,
                QuestionTopic::MaxDrawdown,
                QuestionTopic::MeanDailyReturn,
                QuestionTopic::Sector,
                QuestionTopic::Industry,
                QuestionTopic::MarketCap,
                QuestionTopic::TrailingPe,
                QuestionTopic::ForwardPe,
                QuestionTopic::DividendYield,
                QuestionTopic::Beta,
            ]
        );
    }

    #[test]
    fn test_every_question_has_correct_first_and_four_unique_options() {
        let bank = build_question_bank(&record(metrics(), full_fundamentals())).unwrap();
        for q in &bank {
            assert_eq!(q.correct_option_index(), 0, "{}", q.topic());
            assert_eq!(q.options().len(), 4, "{}", q.topic());
            let unique: std::collections::HashSet<_> = q.options().iter().collect();
            assert_eq!(unique.len(), 4, "{}", q.topic());
            assert!(!q.explanation_text().is_empty());
        }
    }

    #[test]
    fn test_missing_fundamentals_only_price_questions() {
        let bank = build_question_bank(&record(metrics(), FundamentalsSnapshot::unavailable())).unwrap();
        assert_eq!(bank.len(), 5);
        assert!(!topics(&bank).contains(&QuestionTopic::Sector));
    }

    #[test]
    fn test_sector_question_conditional() {
        let mut fundamentals = FundamentalsSnapshot::unavailable();
        let bank = build_question_bank(&record(metrics(), fundamentals.clone())).unwrap();
        assert_eq!(topics(&bank).iter().filter(|t| **t == QuestionTopic::Sector).count(), 0);

        fundamentals.sector = Some("Energy".into());
        let bank = build_question_bank(&record(metrics(), fundamentals)).unwrap();
        let sector: Vec<_> = bank.iter().filter(|q| q.topic() == QuestionTopic::Sector).collect();
        assert_eq!(sector.len(), 1);
        assert_eq!(sector[0].correct_answer(), "Energy");
        assert!(!sector[0].options()[1..].contains(&"Energy".to_string()));
        assert!(sector[0].question_text().contains("AAPL"));
    }

    #[test]
    fn test_direction_question_always_present() {
        let bare = MetricsRecord {
            period_return_pct: None,
            daily_volatility_pct: None,
            annualized_volatility_pct: None,
            max_drawdown_pct: None,
            mean_daily_return_pct: None,
            ..metrics()
        };
        let bank = build_question_bank(&record(bare, FundamentalsSnapshot::unavailable())).unwrap();
        assert_eq!(topics(&bank), vec![QuestionTopic::PriceDirection]);
        assert_eq!(bank[0].correct_answer(), DIRECTION_INCREASED);
    }

    #[test]
    fn test_direction_follows_prices() {
        let down = MetricsRecord { last_price: 80.0, period_return_pct: Some(-20.0), ..metrics() };
        let bank = build_question_bank(&record(down, FundamentalsSnapshot::unavailable())).unwrap();
        assert_eq!(bank[0].correct_answer(), DIRECTION_DECREASED);

        let flat = MetricsRecord { last_price: 100.0, period_return_pct: Some(0.0), ..metrics() };
        let bank = build_question_bank(&record(flat, FundamentalsSnapshot::unavailable())).unwrap();
        assert_eq!(bank[0].correct_answer(), DIRECTION_UNCHANGED);
    }

    #[test]
    fn test_category_answers() {
        assert_eq!(volatility_band(9.0), VOL_LOW);
        assert_eq!(volatility_band(15.0), VOL_MODERATE);
        assert_eq!(volatility_band(45.0), VOL_HIGH);

        assert_eq!(market_cap_class(3.4e12), CAP_MEGA);
        assert_eq!(market_cap_class(50e9), CAP_LARGE);
        assert_eq!(market_cap_class(5e9), CAP_MID);
        assert_eq!(market_cap_class(4e8), CAP_SMALL);

        assert_eq!(beta_class(1.24), BETA_MORE);
        assert_eq!(beta_class(1.0), BETA_IN_LINE);
        assert_eq!(beta_class(0.6), BETA_LESS);
        assert_eq!(beta_class(-0.3), BETA_OPPOSITE);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(3.4e12), "$3.40T");
        assert_eq!(format_amount(12.5e9), "$12.50B");
        assert_eq!(format_amount(850e6), "$850.00M");
        assert_eq!(format_amount(5000.0), "$5000");
    }

    #[test]
    fn test_company_name_falls_back_to_ticker() {
        let mut fundamentals = FundamentalsSnapshot::unavailable();
        fundamentals.market_cap = Some(5e9);
        let bank = build_question_bank(&record(metrics(), fundamentals)).unwrap();
        let cap = bank.iter().find(|q| q.topic() == QuestionTopic::MarketCap).unwrap();
        assert!(cap.question_text().contains("AAPL"));
        assert_eq!(cap.correct_answer(), CAP_MID);
    }
}
