//! Embedded dashboard page, served at `/` when no static directory is set

use axum::response::Html;

pub async fn dashboard_page() -> Html<&'static str> {
    Html(DASHBOARD_HTML)
}

pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Trading Dashboard</title>
    <style>
        body {
            font-family: -apple-system, "Segoe UI", Roboto, sans-serif;
            background: #10141c;
            color: #e6e9ef;
            margin: 0;
            padding: 24px;
        }
        h1 { font-size: 22px; margin: 0 0 4px; }
        .updated { color: #8a93a6; font-size: 13px; margin-bottom: 24px; }
        .grid {
            display: grid;
            grid-template-columns: repeat(auto-fill, minmax(180px, 1fr));
            gap: 16px;
        }
        .card {
            background: #181e2a;
            border: 1px solid #263042;
            border-radius: 6px;
            padding: 16px;
        }
        .label { color: #8a93a6; font-size: 12px; text-transform: uppercase; }
        .value { font-size: 24px; font-weight: 600; margin-top: 6px; }
        .pos { color: #2ecc71; }
        .neg { color: #e74c3c; }
        table { width: 100%; border-collapse: collapse; margin-top: 12px; font-size: 13px; }
        th, td { text-align: left; padding: 6px 8px; border-bottom: 1px solid #263042; }
        th { color: #8a93a6; font-weight: 500; }
        section { margin-top: 32px; }
    </style>
</head>
<body>
    <h1>Trading Dashboard</h1>
    <div class="updated" id="updated">Waiting for terminal data...</div>

    <div class="grid" id="stats"></div>

    <section>
        <h2>Open positions</h2>
        <table id="positions"></table>
    </section>

    <section>
        <h2>Trade history</h2>
        <table id="trades"></table>
    </section>

    <script>
        const STAT_LABELS = [
            ["totalTrades", "Total trades"],
            ["winRate", "Win rate %"],
            ["netProfit", "Net profit"],
            ["profitFactor", "Profit factor"],
            ["totalProfit", "Gross profit"],
            ["totalLoss", "Gross loss"],
            ["averageWin", "Average win"],
            ["averageLoss", "Average loss"],
            ["largestWin", "Largest win"],
            ["largestLoss", "Largest loss"],
            ["winningTrades", "Winners"],
            ["losingTrades", "Losers"],
        ];

        function escapeHtml(value) {
            return String(value ?? "").replace(/[&<>"']/g, c => ({
                "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#39;"
            })[c]);
        }

        function renderStats(stats) {
            document.getElementById("stats").innerHTML = STAT_LABELS.map(([key, label]) => {
                const value = stats[key];
                const n = parseFloat(value);
                const cls = key === "netProfit" ? (n > 0 ? "pos" : n < 0 ? "neg" : "") : "";
                return `<div class="card"><div class="label">${label}</div>` +
                       `<div class="value ${cls}">${escapeHtml(value)}</div></div>`;
            }).join("");
        }

        function renderTable(id, rows) {
            const table = document.getElementById(id);
            if (!rows || rows.length === 0) {
                table.innerHTML = "<tr><td>None</td></tr>";
                return;
            }
            const columns = Object.keys(rows[0]);
            const head = "<tr>" + columns.map(c => `<th>${escapeHtml(c)}</th>`).join("") + "</tr>";
            const body = rows.map(row =>
                "<tr>" + columns.map(c => `<td>${escapeHtml(row[c])}</td>`).join("") + "</tr>"
            ).join("");
            table.innerHTML = head + body;
        }

        async function refresh() {
            try {
                const [statsRes, dataRes] = await Promise.all([
                    fetch("/api/stats"),
                    fetch("/api/data"),
                ]);
                const stats = await statsRes.json();
                const data = await dataRes.json();

                renderStats(stats.stats);
                renderTable("positions", data.positions);
                renderTable("trades", data.trades);
                document.getElementById("updated").textContent = stats.lastUpdate
                    ? "Last update: " + new Date(stats.lastUpdate).toLocaleString()
                    : "Waiting for terminal data...";
            } catch (err) {
                console.error("Refresh failed:", err);
            }
        }

        refresh();
        setInterval(refresh, 5000);
    </script>
</body>
</html>
"#;
