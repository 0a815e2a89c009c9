// src/main.rs

use actix_web::{web, App, HttpServer};
use sqlx::{Pool, Postgres};
use tracing::info;
use tracing_subscriber::EnvFilter;

use lojinha::{carrinho, categorias, produtos, usuarios, vendas, AppState};

// Função principal da aplicação Actix Web.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Carrega variáveis do arquivo .env, se existir.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Certifique-se de que as colunas de preço no banco sejam NUMERIC/DECIMAL
    // para garantir a compatibilidade com bigdecimal::BigDecimal.
    let database_url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL deve estar definida no ambiente");
    let jwt_secret = std::env::var("JWT_SECRET")
        .expect("JWT_SECRET deve estar definida no ambiente");
    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    // Conecta ao banco de dados PostgreSQL usando um pool de conexões.
    let db_pool = Pool::<Postgres>::connect(&database_url)
        .await
        .expect("Falha ao conectar ao banco PostgreSQL");

    // Aplica as migrações pendentes na inicialização.
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Falha ao executar migrações");

    // Cria um estado compartilhado da aplicação com o pool de conexões.
    let app_state = web::Data::new(AppState { db_pool, jwt_secret });

    info!(endereco = %bind_addr, "Iniciando API da lojinha");

    // Configura e inicia o servidor HTTP.
    HttpServer::new(move || {
        App::new()
            // Adiciona o estado compartilhado à aplicação.
            .app_data(app_state.clone())
            // Módulo de Usuários
            .service(usuarios::usuario_router::cadastrar_usuario)
            .service(usuarios::usuario_router::login_usuario)
            // Módulo de Categorias
            .service(categorias::categoria_router::cadastrar_categoria)
            .service(categorias::categoria_router::buscar_categorias)
            .service(categorias::categoria_router::buscar_categoria_por_id)
            .service(categorias::categoria_router::atualizar_categoria)
            .service(categorias::categoria_router::deletar_categoria)
            // Módulo de Produtos
            .service(produtos::produtos_router::buscar_produtos)
            .service(produtos::produtos_router::buscar_produto_por_id)
            .service(produtos::produtos_router::cadastrar_produto)
            .service(produtos::produtos_router::atualizar_produto)
            .service(produtos::produtos_router::deletar_produto)
            // Módulo do Carrinho
            .service(carrinho::carrinho_router::ver_carrinho)
            .service(carrinho::carrinho_router::adicionar_item)
            .service(carrinho::carrinho_router::atualizar_item)
            .service(carrinho::carrinho_router::remover_item)
            .service(carrinho::carrinho_router::sincronizar_carrinho)
            // Módulo de Vendas
            .service(vendas::vendas_router::realizar_venda)
            .service(vendas::vendas_router::listar_vendas)
            .service(vendas::vendas_router::minhas_vendas)
            .service(vendas::vendas_router::buscar_venda_por_id)
            .service(vendas::vendas_router::concluir_venda)
            .service(vendas::vendas_router::cancelar_venda)
    })
    .bind(bind_addr)?
    .run()
    .await
}
