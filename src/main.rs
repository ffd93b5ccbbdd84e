// region:    --- Imports
use auction_client::bidding::ItemDetail;
use auction_client::config::ClientConfig;
use auction_client::counters::{CartCounter, NotificationCenter};
use auction_client::error::{Error, Result};
use auction_client::format::{format_date_time, Currency};
use auction_client::http::ApiClient;
use auction_client::model::{Item, PageRequest, RegisterRequest, Role};
use auction_client::payment::{list_won, PaymentDialog, PaymentTarget};
use auction_client::poller::Visibility;
use auction_client::services::{cart, items, watchlist};
use auction_client::session::Session;
use auction_client::shell::{authorize, RouteDecision, ToastKind, Toasts};
use auction_client::storage::FileStore;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Cli
/// eAuction 명령줄 클라이언트
#[derive(Parser)]
#[command(name = "auction-client", version)]
struct Cli {
    /// API 기본 주소 (환경 변수보다 우선)
    #[arg(long, env = "EAUCTION_API_BASE_URL", global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// BUYER | SELLER
        #[arg(long)]
        role: Option<Role>,
    },
    Logout,
    Whoami,
    /// 상품 목록
    Items {
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        size: u32,
        /// 진행 중인 경매만
        #[arg(long)]
        active: bool,
    },
    /// 상품 상세 (--watch 면 Ctrl-C 까지 폴링)
    Item {
        id: String,
        #[arg(long)]
        watch: bool,
    },
    /// 입찰 (검증 -> 확정)
    Bid { item_id: String, amount: String },
    /// 장바구니
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// 관심 목록 (상품 ID 를 주면 토글)
    Watch { item_id: Option<String> },
    /// 낙찰 상품과 결제 여부
    Won,
    /// 낙찰 상품 결제 (상품 ID 또는 경매 ID)
    Pay {
        id: String,
        #[arg(long)]
        card_number: String,
        #[arg(long)]
        cardholder: String,
        #[arg(long)]
        expiry: String,
        #[arg(long)]
        cvv: String,
    },
    Notifications {
        /// 모두 읽음 처리
        #[arg(long)]
        mark_all: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    List,
    Add { item_id: String },
    Remove { item_id: String },
    Clear,
}
// endregion: --- Cli

// region:    --- Main
#[tokio::main]
async fn main() -> ExitCode {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:<12} --> 명령 실패: {:?}", "Main", e);
            if e.is_client_side() || matches!(e, Error::Server { .. } | Error::Unauthorized(_)) {
                eprintln!("오류: {}", e.user_message());
            } else {
                eprintln!("문제가 발생했습니다. 잠시 후 다시 시도하세요. ({e})");
            }
            ExitCode::FAILURE
        }
    }
}

struct App {
    config: ClientConfig,
    session: Arc<Session>,
    cart: Arc<CartCounter>,
    toasts: Toasts,
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.base_url {
        config = config.with_base_url(url);
    }
    info!("{:<12} --> API: {}", "Main", config.api_base_url);

    let store = Arc::new(FileStore::open(config.store_path.clone())?);
    let client = Arc::new(ApiClient::new(&config, store)?);
    let session = Arc::new(Session::new(client));
    session.init().await;

    let app = App {
        cart: Arc::new(CartCounter::new(Arc::clone(&session))),
        toasts: Toasts::new(),
        config,
        session,
    };
    let result = dispatch(&app, cli.command).await;
    print_toasts(&app.toasts);
    result
}

async fn dispatch(app: &App, command: Command) -> Result<()> {
    match command {
        Command::Login { email, password } => {
            let user = app.session.login(&email, &password).await?;
            println!("로그인: {} <{}>", user.name, user.email);
        }
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let request = RegisterRequest {
                name,
                email,
                password,
                role,
            };
            let user = app.session.register(&request).await?;
            println!("가입 완료: {} <{}>", user.name, user.email);
        }
        Command::Logout => {
            app.session.logout();
            println!("로그아웃했습니다.");
        }
        Command::Whoami => match app.session.current_user() {
            Some(user) => {
                let roles: Vec<String> = user.roles.iter().map(|r| format!("{r:?}")).collect();
                println!("{} <{}> [{}]", user.name, user.email, roles.join(", "));
            }
            None => println!("로그인하지 않았습니다."),
        },
        Command::Items { page, size, active } => {
            let request = PageRequest { page, size };
            let page = if active {
                items::list_active_items(app.session.client(), request).await?
            } else {
                items::list_items(app.session.client(), request).await?
            };
            for item in &page.content {
                println!(
                    "{:<26} {:<32} {:>12}  {}",
                    item.id,
                    item.title,
                    app.config.currency.format(item.display_price()),
                    format_date_time(item.auction_end_time)
                );
            }
            println!(
                "{}/{} 페이지, 전체 {}건",
                page.number + 1,
                page.total_pages.max(1),
                page.total_elements
            );
        }
        Command::Item { id, watch } => show_item(app, &id, watch).await?,
        Command::Bid { item_id, amount } => {
            require(app, None)?;
            let detail = open_detail(app, &item_id).await;
            detail.set_bid_input(amount);
            let amount = detail.submit_bid()?;
            println!("{} 입찰을 확정합니다.", app.config.currency.format(amount));
            let bid = detail.confirm_bid().await?;
            println!("입찰 완료 id: {}", bid.id);
            detail.close();
        }
        Command::Cart { action } => {
            require(app, None)?;
            match action.unwrap_or(CartAction::List) {
                CartAction::List => {
                    for item in cart::get_cart_items(app.session.client()).await? {
                        print_item_row(&item, app.config.currency);
                    }
                    println!("장바구니 {}개", app.cart.refresh().await?);
                }
                CartAction::Add { item_id } => {
                    app.cart.refresh().await?;
                    app.cart.add(&item_id).await?;
                    println!("추가했습니다. (장바구니 {}개)", app.cart.count());
                }
                CartAction::Remove { item_id } => {
                    app.cart.refresh().await?;
                    app.cart.remove(&item_id).await?;
                    println!("제거했습니다. (장바구니 {}개)", app.cart.count());
                }
                CartAction::Clear => {
                    app.cart.clear().await?;
                    println!("장바구니를 비웠습니다.");
                }
            }
        }
        Command::Watch { item_id } => {
            require(app, None)?;
            match item_id {
                Some(item_id) => {
                    let detail = open_detail(app, &item_id).await;
                    let member = detail.toggle_watchlist().await?;
                    println!("관심 목록: {}", if member { "추가됨" } else { "제거됨" });
                    detail.close();
                }
                None => {
                    for item in watchlist::get_watchlist(app.session.client()).await? {
                        print_item_row(&item, app.config.currency);
                    }
                }
            }
        }
        Command::Won => {
            require(app, Some(&[Role::Buyer, Role::Seller, Role::Admin][..]))?;
            let won = list_won(&app.session).await?;
            for item in won.items() {
                println!(
                    "{:<26} {:<32} {:>12}  {}",
                    item.bid.item_id.as_deref().or(item.bid.auction_id.as_deref()).unwrap_or("-"),
                    item.bid.item_title().unwrap_or("Auction Item"),
                    app.config.currency.format(item.bid.amount),
                    item.action_label()
                );
            }
            println!("결제 {}건, 미결제 {}건", won.paid_count(), won.unpaid_count());
        }
        Command::Pay {
            id,
            card_number,
            cardholder,
            expiry,
            cvv,
        } => {
            require(app, None)?;
            let won = list_won(&app.session).await?;
            let item = won
                .find(&id)
                .ok_or_else(|| Error::Validation(format!("낙찰 상품을 찾을 수 없습니다: {id}")))?;
            if !item.needs_payment() {
                println!("이미 결제된 상품입니다.");
                return Ok(());
            }

            let dialog = PaymentDialog::new(
                PaymentTarget::from(&item.bid),
                Arc::clone(&app.session),
                app.config.payment_delay,
                app.toasts.clone(),
            );
            dialog.set_card_number(&card_number);
            dialog.set_cardholder(&cardholder);
            dialog.set_expiry(&expiry);
            dialog.set_cvv(&cvv);

            let totals = dialog.totals();
            println!(
                "금액 {} + 수수료 {} = {}",
                app.config.currency.format(totals.subtotal),
                app.config.currency.format(totals.fee),
                app.config.currency.format(totals.total)
            );
            dialog.confirm().await?;
            if let Some(view) = dialog.success_view(app.config.auto_close_after) {
                println!("{}\n", view.headline());
                println!("{}", view.receipt_text());
            }
        }
        Command::Notifications { mark_all } => {
            require(app, None)?;
            let center = NotificationCenter::new(Arc::clone(&app.session));
            center.refresh().await?;
            if mark_all {
                let marked = center.mark_all_read().await?;
                println!("{marked}건 읽음 처리했습니다.");
            }
            for n in center.notifications() {
                println!(
                    "{} {} {}: {}",
                    if n.read { " " } else { "*" },
                    format_date_time(n.created_at),
                    n.title.as_deref().unwrap_or("알림"),
                    n.message.as_deref().unwrap_or("")
                );
            }
            println!("읽지 않은 알림 {}건", center.unread_count());
        }
    }
    Ok(())
}
// endregion: --- Main

// region:    --- Helpers
fn require(app: &App, roles: Option<&[Role]>) -> Result<()> {
    match authorize(&app.session, roles) {
        RouteDecision::Allow => Ok(()),
        RouteDecision::RedirectHome => Err(Error::Validation("권한이 없습니다.".to_string())),
        RouteDecision::Loading | RouteDecision::RedirectLogin => {
            Err(Error::Unauthorized("로그인이 필요합니다.".to_string()))
        }
    }
}

async fn open_detail(app: &App, item_id: &str) -> Arc<ItemDetail> {
    ItemDetail::open(
        item_id,
        Arc::clone(&app.session),
        Arc::clone(&app.cart),
        app.toasts.clone(),
    )
    .await
}

async fn show_item(app: &App, id: &str, watch: bool) -> Result<()> {
    let detail = open_detail(app, id).await;
    print_detail(&detail, app.config.currency);
    if !watch {
        detail.close();
        return Ok(());
    }

    let poller = detail.start_polling(Visibility::default(), app.config.poll_interval)?;
    let mut ticker = tokio::time::interval(app.config.poll_interval);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => print_detail(&detail, app.config.currency),
        }
    }
    detail.close();
    poller.stop().await;
    Ok(())
}

fn print_detail(detail: &ItemDetail, currency: Currency) {
    let snapshot = detail.snapshot();
    if let Some(message) = &snapshot.error {
        println!("오류: {message}");
    }
    let Some(item) = &snapshot.item else {
        return;
    };
    println!("{} ({:?})", item.title, item.status);
    println!(
        "현재가 {}  최소 입찰가 초과 {}  남은 시간 {}",
        currency.format(item.display_price()),
        currency.format(snapshot.minimum_bid()),
        detail.time_remaining(Utc::now())
    );
    for bid in &snapshot.bids {
        println!(
            "  {:>12}  {}  {:?}",
            currency.format(bid.amount),
            format_date_time(bid.timestamp),
            bid.status
        );
    }
}

fn print_item_row(item: &Item, currency: Currency) {
    println!(
        "{:<26} {:<32} {:>12}",
        item.id,
        item.title,
        currency.format(item.display_price())
    );
}

fn print_toasts(toasts: &Toasts) {
    for toast in toasts.drain() {
        let mark = match toast.kind {
            ToastKind::Success => "[성공]",
            ToastKind::Error => "[오류]",
            ToastKind::Info => "[알림]",
        };
        println!("{mark} {}: {}", toast.title, toast.message);
    }
}
// endregion: --- Helpers
