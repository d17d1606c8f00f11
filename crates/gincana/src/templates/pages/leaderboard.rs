use gincana_core::{RankedParticipant, Rule};
use maud::{html, Markup};

use crate::domain::Rankings;

/// Medal shown on the podium for the first three places
fn medal(rank: usize) -> &'static str {
    match rank {
        1 => "🥇",
        2 => "🥈",
        _ => "🥉",
    }
}

pub fn delta_tag(delta: Option<i64>) -> Markup {
    match delta {
        Some(delta) if delta > 0 => html! { span class="tag is-success is-light" { "+" (delta) } },
        Some(delta) if delta < 0 => html! { span class="tag is-danger is-light" { (delta) } },
        _ => html! { span class="has-text-grey-light" { "—" } },
    }
}

fn podium(top: &[RankedParticipant]) -> Markup {
    html! {
        div class="columns is-centered has-text-centered" {
            @for entry in top {
                div class="column is-one-third" {
                    div class="box" {
                        p class="title is-2" { (medal(entry.rank)) }
                        p class="title is-5" { (entry.name) }
                        p class="subtitle is-6" { (entry.points) " pts" }
                    }
                }
            }
        }
    }
}

fn ranking_row(entry: &RankedParticipant) -> Markup {
    html! {
        tr {
            td { (entry.rank) }
            td { (entry.name) }
            td class="has-text-right" { (entry.points) }
            td class="has-text-right" { (delta_tag(entry.delta)) }
        }
    }
}

fn rules_section(rules: &[Rule]) -> Markup {
    html! {
        div class="box" {
            h4 class="title is-4" { "Regras" }
            @if rules.is_empty() {
                p class="has-text-grey" { "Nenhuma regra cadastrada." }
            } @else {
                table class="table is-fullwidth is-narrow" {
                    tbody {
                        @for rule in rules {
                            tr {
                                td { (rule.description) }
                                td class="has-text-right" { strong { (rule.points) } }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Leaderboard page content: podium, full ranking with deltas, and the rules
pub fn leaderboard_page(rankings: &Rankings, rules: &[Rule]) -> Markup {
    let top = &rankings.participants[..rankings.participants.len().min(3)];

    html! {
        div id="leaderboard" class="container" {
            div class="level" {
                div class="level-left" {
                    h3 class="title is-3" {
                        "Classificação"
                        @if let Some(season) = &rankings.season {
                            " " (season)
                        }
                    }
                }
                div class="level-right" {
                    span class="tag is-info is-light" { "Versão " (rankings.version) }
                }
            }

            @if rankings.participants.is_empty() {
                div class="notification is-light" { "Nenhum participante ainda." }
            } @else {
                (podium(top))

                div class="box" {
                    div class="table-container" {
                        table id="rankingTable" class="table is-fullwidth is-striped is-hoverable" {
                            thead {
                                tr {
                                    th { "#" }
                                    th { "Nome" }
                                    th class="has-text-right" { "Pontos" }
                                    th class="has-text-right" {
                                        "Novos"
                                        @if let Some(points_as_of) = &rankings.points_as_of {
                                            br;
                                            small class="has-text-grey" { "desde " (points_as_of) }
                                        }
                                    }
                                }
                            }
                            tbody {
                                @for entry in &rankings.participants {
                                    (ranking_row(entry))
                                }
                            }
                        }
                    }
                }
            }

            (rules_section(rules))

            @if let Some(updated_at) = &rankings.updated_at {
                p class="has-text-grey is-size-7" { "Atualizado em " (updated_at) }
            }
        }
    }
}
