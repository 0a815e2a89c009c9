// src/carrinho/carrinho_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};

use super::carrinho_service;
use super::carrinho_structs::{ItemCarrinho, SincronizacaoCarrinho};
use crate::shared::erros::ErroLoja;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Corpo da requisição de remoção: apenas o produto.
#[derive(serde::Deserialize)]
pub struct RemocaoItem {
    pub produto_id: i32,
}

/// Rota para visualizar o carrinho do usuário autenticado.
/// O carrinho é criado vazio na primeira visita.
#[get("/carrinho")]
pub async fn ver_carrinho(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ErroLoja> {
    let carrinho = carrinho_service::buscar_carrinho(&data.db_pool, usuario.user_id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok("Conteúdo do carrinho", carrinho)))
}

/// Rota para adicionar um item ao carrinho do usuário autenticado.
#[post("/carrinho/adicionar")]
pub async fn adicionar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<ItemCarrinho>,
) -> Result<HttpResponse, ErroLoja> {
    let carrinho = carrinho_service::adicionar_item(
        &data.db_pool,
        usuario.user_id,
        item.produto_id,
        item.quantidade,
    )
    .await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Item adicionado ao carrinho com sucesso!",
        carrinho,
    )))
}

/// Rota para sobrescrever a quantidade de um item do carrinho.
/// Quantidade zero ou negativa remove o item.
#[put("/carrinho/atualizar")]
pub async fn atualizar_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    item: web::Json<ItemCarrinho>,
) -> Result<HttpResponse, ErroLoja> {
    let carrinho = carrinho_service::atualizar_quantidade(
        &data.db_pool,
        usuario.user_id,
        item.produto_id,
        item.quantidade,
    )
    .await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Carrinho atualizado com sucesso!",
        carrinho,
    )))
}

/// Rota para remover um item do carrinho.
#[delete("/carrinho/remover")]
pub async fn remover_item(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    corpo: web::Json<RemocaoItem>,
) -> Result<HttpResponse, ErroLoja> {
    let carrinho =
        carrinho_service::remover_item(&data.db_pool, usuario.user_id, corpo.produto_id).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Item removido do carrinho com sucesso!",
        carrinho,
    )))
}

/// Rota para sincronizar o carrinho com o estado mantido pelo cliente.
/// Substitui todos os itens de uma vez, atomicamente.
#[put("/carrinho/sincronizar")]
pub async fn sincronizar_carrinho(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    corpo: web::Json<SincronizacaoCarrinho>,
) -> Result<HttpResponse, ErroLoja> {
    let carrinho =
        carrinho_service::sincronizar_carrinho(&data.db_pool, usuario.user_id, &corpo.itens).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok(
        "Carrinho sincronizado com sucesso!",
        carrinho,
    )))
}
