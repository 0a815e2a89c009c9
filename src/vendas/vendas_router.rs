// src/vendas/vendas_router.rs

use actix_web::{delete, get, post, put, web, HttpResponse};

use super::vendas_service;
use super::vendas_structs::PaginacaoVendas;
use crate::shared::erros::ErroLoja;
use crate::shared::shared_structs::GenericResponse;
use crate::usuarios::auth_middleware::AuthenticatedUser;
use crate::AppState;

/// Rota para fechar o carrinho do usuário autenticado em uma venda.
///
/// Todo o processo (validação de estoque, cálculo do total, criação da venda
/// e de seus itens, débito de estoque e esvaziamento do carrinho) acontece em
/// uma única transação de banco de dados.
#[post("/vendas")]
pub async fn realizar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ErroLoja> {
    let venda = vendas_service::criar_venda(&data.db_pool, usuario.user_id).await?;
    Ok(HttpResponse::Created().json(GenericResponse::ok("Venda realizada com sucesso!", venda)))
}

/// Rota para listar todas as vendas, paginadas. Apenas administradores.
#[get("/vendas")]
pub async fn listar_vendas(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    paginacao: web::Query<PaginacaoVendas>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let vendas =
        vendas_service::listar_vendas(&data.db_pool, paginacao.pagina, paginacao.limite).await?;
    Ok(HttpResponse::Ok().json(vendas))
}

/// Rota para listar as vendas do próprio usuário autenticado.
#[get("/vendas/minhas")]
pub async fn minhas_vendas(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
) -> Result<HttpResponse, ErroLoja> {
    let vendas = vendas_service::vendas_do_usuario(&data.db_pool, usuario.user_id).await?;
    Ok(HttpResponse::Ok().json(vendas))
}

/// Rota para buscar uma venda com seus itens. Apenas o dono ou um
/// administrador.
#[get("/vendas/{id}")]
pub async fn buscar_venda_por_id(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    let venda = vendas_service::buscar_venda(
        &data.db_pool,
        path.into_inner(),
        usuario.user_id,
        usuario.eh_admin(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(venda))
}

/// Rota para marcar uma venda pendente como concluída. Apenas administradores.
#[put("/vendas/{id}/concluir")]
pub async fn concluir_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    if !usuario.eh_admin() {
        return Err(ErroLoja::NaoAutorizado);
    }

    let venda = vendas_service::concluir_venda(&data.db_pool, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok("Venda concluída com sucesso!", venda)))
}

/// Rota para cancelar uma venda pendente, devolvendo o estoque. Apenas o dono
/// ou um administrador.
#[delete("/vendas/{id}")]
pub async fn cancelar_venda(
    data: web::Data<AppState>,
    usuario: AuthenticatedUser,
    path: web::Path<i32>,
) -> Result<HttpResponse, ErroLoja> {
    let venda = vendas_service::cancelar_venda(
        &data.db_pool,
        path.into_inner(),
        usuario.user_id,
        usuario.eh_admin(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(GenericResponse::ok("Venda cancelada com sucesso!", venda)))
}
