//! Fixed concept flashcards. Not randomized; a few backs mention the analyzed
//! company by name.

use analysis_core::AnalysisRecord;

use crate::types::Flashcard;

pub fn build_flashcards(analysis: &AnalysisRecord) -> Vec<Flashcard> {
    let name = analysis.company_name();

    vec![
        Flashcard::new(
            "What is volatility?",
            "Volatility measures how much a price moves around its average. \
             We compute it as the standard deviation of daily returns; \
             multiplying by the square root of 252 trading days gives the annualized figure.",
        ),
        Flashcard::new(
            "What is maximum drawdown?",
            "Maximum drawdown is the largest percentage fall from a previous peak to a later low \
             before a new peak is reached. It shows the worst loss an investor could have sat through.",
        ),
        Flashcard::new(
            format!("What is the period return for {}?", name),
            format!(
                "The period return is the percentage change from the first closing price to the last \
                 closing price over the selected period. For {} it tells you how much the price went up \
                 or down in total.",
                name
            ),
        ),
        Flashcard::new(
            "What is the P/E ratio?",
            "The price-to-earnings ratio is the share price divided by earnings per share. \
             Trailing P/E uses the past 12 months of earnings; forward P/E uses analysts' estimates \
             for the next 12 months.",
        ),
        Flashcard::new(
            "What is dividend yield?",
            "Dividend yield is the annual dividend per share divided by the share price, shown as a \
             percentage. It is the cash return paid to shareholders, separate from price changes.",
        ),
        Flashcard::new(
            "What is market capitalization?",
            format!(
                "Market capitalization is the share price times the number of shares outstanding: \
                 the total market value of a company such as {}. Companies are grouped into mega, large, \
                 mid and small caps by this value.",
                name
            ),
        ),
        Flashcard::new(
            "What is beta?",
            "Beta compares a stock's price moves with the overall market. A beta of 1 moves with the \
             market, above 1 swings more, below 1 swings less, and a negative beta tends to move the \
             opposite way.",
        ),
    ]
}
