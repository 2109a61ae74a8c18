//! Chart generation and rendering for the monthly totals chart.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered with an HTML container and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip,
        Trigger,
    },
    series::bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    chart::aggregation::{MonthlyTotal, monthly_totals},
    html::{CARD_STYLE, HeadElement},
    transaction::Transaction,
};

const CHART_ID: &str = "monthly-chart";

/// Renders the chart card, or its empty state when there is nothing to plot.
pub(crate) fn monthly_chart_view(transactions: &[Transaction]) -> Markup {
    html!(
        section class=(CARD_STYLE)
        {
            h2 class="text-xl font-bold mb-4" { "Monthly Expenses" }

            @if transactions.is_empty() {
                div class="h-80 flex items-center justify-center"
                {
                    p class="text-gray-500 dark:text-gray-400" { "No data to display" }
                }
            } @else {
                div
                    id=(CHART_ID)
                    class="h-80 min-h-[320px] rounded"
                {}
            }
        }
    )
}

/// Generates the JavaScript that initializes the chart.
///
/// Returns `None` when there is no data, in which case [monthly_chart_view]
/// renders the empty state instead of a chart container.
pub(crate) fn monthly_chart_script(transactions: &[Transaction]) -> Option<HeadElement> {
    let totals = monthly_totals(transactions);

    if totals.is_empty() {
        return None;
    }

    let options = monthly_chart(&totals).to_string();
    let script = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
            const chartDom = document.getElementById("{CHART_ID}");
            const chart = echarts.init(chartDom);
            const option = {options};
            chart.setOption(option);

            window.addEventListener('resize', chart.resize);
        }});"#
    );

    Some(HeadElement::ScriptSource(PreEscaped(script)))
}

fn monthly_chart(totals: &[MonthlyTotal]) -> Chart {
    let labels: Vec<String> = totals.iter().map(MonthlyTotal::label).collect();
    let values: Vec<f64> = totals.iter().map(|month| month.total.as_dollars()).collect();

    Chart::new()
        .title(Title::new().subtext("Last six months"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            bar::Bar::new()
                .name("Amount")
                .item_style(ItemStyle::new().color("#3b82f6"))
                .data(values),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
