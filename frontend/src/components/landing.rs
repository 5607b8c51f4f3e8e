use crate::components::icons::CloudShield;
use crate::web::router::Link;
use keeply_shared::AppRoute;
use leptos::prelude::*;

const FEATURES: [(&str, &str, &str); 3] = [
    (
        "☁️",
        "Backup automático",
        "Proteja seus arquivos sem rotina manual. A Keeply faz o trabalho pesado por você.",
    ),
    (
        "♻️",
        "Restauração simples",
        "Recupere dados importantes em poucos cliques, sem burocracia e sem dor de cabeça.",
    ),
    (
        "🛡️",
        "Segurança e redundância",
        "Se algo acontecer com seu dispositivo, seus dados continuam protegidos e acessíveis.",
    ),
];

#[component]
pub fn LandingPage() -> impl IntoView {
    let year = chrono::Local::now().format("%Y").to_string();

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <div class="navbar bg-base-100 shadow">
                <div class="flex-1">
                    <Link href=AppRoute::Landing.to_path() class="btn btn-ghost text-xl gap-2">
                        <CloudShield attr:class="text-primary h-6 w-6" />
                        "Keeply"
                    </Link>
                </div>
                <div class="flex-none gap-2">
                    <Link href=AppRoute::Login.to_path() class="btn btn-ghost">"Entrar"</Link>
                    <Link href=AppRoute::Register.to_path() class="btn btn-primary">"Criar conta"</Link>
                </div>
            </div>

            <section id="inicio" class="hero py-16">
                <div class="hero-content text-center">
                    <div class="max-w-2xl">
                        <h1 class="text-5xl font-bold">
                            <span class="text-primary">"Backups leves"</span>
                            <br />
                            "e sem burocracia"
                        </h1>
                        <p class="py-6 text-base-content/70">
                            "Guarde seus dados com segurança e redundância, de forma simples. A Keeply foi feita para quem só quer uma coisa: não perder arquivos importantes."
                        </p>
                        <div class="flex flex-wrap justify-center gap-3">
                            <Link href=AppRoute::Register.to_path() class="btn btn-primary btn-lg">
                                "Ainda não estou Protegido!"
                            </Link>
                            <Link href=AppRoute::Login.to_path() class="btn btn-outline btn-lg">"Entrar"</Link>
                        </div>
                    </div>
                </div>
            </section>

            <section id="beneficios" class="max-w-6xl mx-auto px-4 pb-16">
                <div class="grid grid-cols-1 md:grid-cols-3 gap-6">
                    {FEATURES
                        .into_iter()
                        .map(|(icon, title, description)| view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body">
                                    <div class="text-3xl">{icon}</div>
                                    <h3 class="card-title">{title}</h3>
                                    <p class="text-base-content/70">{description}</p>
                                </div>
                            </div>
                        })
                        .collect_view()}
                </div>
            </section>

            <footer class="footer footer-center p-6 bg-base-100 text-base-content/60">
                <p>"© " {year} " Keeply. Todos os direitos reservados."</p>
            </footer>
        </div>
    }
}
