use maud::{DOCTYPE, Markup, html};

use crate::{
    entities::{actor, movie},
    models::{ActorCredit, CastMember},
};

const TAILWIND_CDN: &str = "https://cdn.tailwindcss.com";

pub fn index_page(movies: &[movie::Model], actors: &[actor::Model]) -> String {
    page(
        "Casting",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    (nav())
                    div class="mt-8 grid gap-6 md:grid-cols-2" {
                        div class="bg-white shadow rounded-lg p-6" {
                            h2 class="text-xl font-semibold text-gray-900" { "Movies" }
                            @if movies.is_empty() {
                                p class="mt-4 text-sm text-gray-500" { "No movies yet." }
                            } @else {
                                ul class="mt-4 space-y-2" {
                                    @for movie in movies {
                                        li class="text-gray-700" data-mov-id=(movie.mov_id) {
                                            span class="font-medium" { (movie.mov_title) }
                                            span class="ml-2 text-gray-500" { "(" (movie.mov_release) ")" }
                                            @if let Some(language) = &movie.mov_language {
                                                span class="ml-2 text-xs uppercase text-gray-400" { (language) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        div class="bg-white shadow rounded-lg p-6" {
                            h2 class="text-xl font-semibold text-gray-900" { "Actors" }
                            @if actors.is_empty() {
                                p class="mt-4 text-sm text-gray-500" { "No actors yet." }
                            } @else {
                                ul class="mt-4 space-y-2" {
                                    @for actor in actors {
                                        li class="text-gray-700" data-act-id=(actor.act_id) { (full_name(actor)) }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn actors_page(portfolios: &[(actor::Model, Vec<ActorCredit>)]) -> String {
    page(
        "Actors",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    (nav())
                    div class="mt-8 space-y-4" {
                        @for (actor, credits) in portfolios {
                            div class="bg-white shadow rounded-lg p-6" {
                                h2 class="text-xl font-semibold text-gray-900" { (full_name(actor)) }
                                @if credits.is_empty() {
                                    p class="mt-2 text-sm text-gray-500" { "Not cast in any movie." }
                                } @else {
                                    ul class="mt-2 space-y-1" {
                                        @for credit in credits {
                                            li class="text-sm text-gray-700" {
                                                span class="font-medium" { (credit.mov_title) }
                                                " (" (credit.mov_release) ")"
                                                @if let Some(role) = &credit.cas_role {
                                                    span class="text-gray-500" { " · " (role) }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn cast_page(listings: &[(movie::Model, Vec<CastMember>)]) -> String {
    page(
        "Cast",
        html! {
            div class="min-h-screen bg-gray-50" {
                div class="max-w-4xl mx-auto px-6 py-12" {
                    (nav())
                    div class="mt-8 space-y-4" {
                        @for (movie, members) in listings {
                            div class="bg-white shadow rounded-lg p-6" {
                                h2 class="text-xl font-semibold text-gray-900" {
                                    (movie.mov_title)
                                    span class="ml-2 font-normal text-gray-500" { "(" (movie.mov_release) ")" }
                                }
                                @if members.is_empty() {
                                    p class="mt-2 text-sm text-gray-500" { "No cast assigned." }
                                } @else {
                                    ul class="mt-2 space-y-1" {
                                        @for member in members {
                                            li class="text-sm text-gray-700" {
                                                (member.act_firstname) " " (member.act_lastname)
                                                @if let Some(role) = &member.cas_role {
                                                    span class="text-gray-500" { " as " (role) }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}

pub fn error_page(message: &str) -> String {
    page(
        "Error",
        html! {
            div class="min-h-screen bg-gray-50 flex items-center justify-center" {
                div class="max-w-xl w-full px-6" {
                    div class="bg-white shadow rounded-lg p-8" {
                        h1 class="text-2xl font-bold text-gray-900" { "Error" }
                        p class="mt-4 text-gray-700" { (message) }
                        a class="mt-6 inline-block text-blue-600 hover:text-blue-800" href="/" { "Back" }
                    }
                }
            }
        },
    )
}

fn page(title: &str, body: Markup) -> String {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                script src=(TAILWIND_CDN) {}
            }
            body { (body) }
        }
    }
    .into_string()
}

fn nav() -> Markup {
    html! {
        nav class="flex gap-6 text-sm font-medium" {
            a class="text-blue-600 hover:text-blue-800" href="/" { "Overview" }
            a class="text-blue-600 hover:text-blue-800" href="/actor" { "Actors" }
            a class="text-blue-600 hover:text-blue-800" href="/cast" { "Cast" }
        }
    }
}

fn full_name(actor: &actor::Model) -> String {
    format!("{} {}", actor.act_firstname, actor.act_lastname)
}
