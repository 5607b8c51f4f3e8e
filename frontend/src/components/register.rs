use crate::components::icons::{AlertCircle, CheckCircle, CloudShield};
use crate::session::keeply_api;
use crate::web::router::{Link, use_router};
use keeply_shared::AppRoute;
use keeply_shared::protocol::RegisterForm;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_millis(1200);

#[component]
pub fn RegisterPage() -> impl IntoView {
    let router = use_router();

    let (form, set_form) = signal(RegisterForm::default());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_submitting.get_untracked() {
            return;
        }

        set_error_msg.set(None);
        set_success_msg.set(None);
        set_is_submitting.set(true);

        let data = form.get_untracked();
        spawn_local(async move {
            match keeply_api().register(&data).await {
                Ok(()) => {
                    set_success_msg.set(Some(
                        "Cadastro realizado. Verifique seu e-mail para confirmar a conta."
                            .to_string(),
                    ));
                    set_timeout(
                        move || router.navigate(AppRoute::Login.to_path()),
                        SUCCESS_REDIRECT_DELAY,
                    );
                }
                Err(e) => set_error_msg.set(Some(e.to_string())),
            }
            set_is_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-2xl">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <CloudShield attr:class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"Criar conta"</h1>
                        <p class="text-base-content/70">"Proteja seus arquivos em poucos minutos"</p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body grid grid-cols-1 md:grid-cols-2 gap-x-4" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2 md:col-span-2">
                                <AlertCircle attr:class="h-5 w-5 shrink-0" />
                                <span>{msg}</span>
                            </div>
                        })}
                        {move || success_msg.get().map(|msg| view! {
                            <div role="status" class="alert alert-success text-sm py-2 md:col-span-2">
                                <CheckCircle attr:class="h-5 w-5 shrink-0" />
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control md:col-span-2">
                            <label class="label" for="full_name">
                                <span class="label-text">"Nome completo"</span>
                            </label>
                            <input
                                id="full_name"
                                type="text"
                                autocomplete="name"
                                placeholder="Seu nome completo"
                                on:input=move |ev| set_form.update(|f| f.full_name = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.full_name.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="cpf">
                                <span class="label-text">"CPF"</span>
                            </label>
                            <input
                                id="cpf"
                                type="text"
                                inputmode="numeric"
                                placeholder="Somente números ou formatado"
                                on:input=move |ev| set_form.update(|f| f.cpf = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.cpf.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="phone_number">
                                <span class="label-text">"Telefone"</span>
                            </label>
                            <input
                                id="phone_number"
                                type="tel"
                                autocomplete="tel"
                                placeholder="DDD + número"
                                on:input=move |ev| set_form.update(|f| f.phone_number = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.phone_number.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="birth_date">
                                <span class="label-text">"Data de nascimento"</span>
                            </label>
                            <input
                                id="birth_date"
                                type="date"
                                on:input=move |ev| set_form.update(|f| f.birth_date = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.birth_date.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="email">
                                <span class="label-text">"E-mail"</span>
                            </label>
                            <input
                                id="email"
                                type="email"
                                autocomplete="email"
                                placeholder="voce@exemplo.com"
                                on:input=move |ev| set_form.update(|f| f.email = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.email.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control md:col-span-2">
                            <label class="label" for="password">
                                <span class="label-text">"Senha"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="new-password"
                                placeholder="Mínimo de 8 caracteres"
                                minlength="8"
                                on:input=move |ev| set_form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <label class="label cursor-pointer justify-start gap-3 md:col-span-2 mt-2">
                            <input
                                type="checkbox"
                                class="checkbox checkbox-primary"
                                on:change=move |ev| set_form.update(|f| f.accepted_terms = event_target_checked(&ev))
                                prop:checked=move || form.with(|f| f.accepted_terms)
                            />
                            <span class="label-text">"Aceito os termos de uso e a política de privacidade."</span>
                        </label>
                        <div class="form-control mt-6 md:col-span-2">
                            <button class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Cadastrando..." }.into_any()
                                } else {
                                    "Criar conta".into_any()
                                }}
                            </button>
                        </div>
                        <p class="text-sm text-center text-base-content/70 mt-2 md:col-span-2">
                            "Já tem conta? "
                            <Link href=AppRoute::Login.to_path() class="link link-primary">"Entrar"</Link>
                        </p>
                    </form>
                </div>
            </div>
        </div>
    }
}
